//! Observability setup shared by the binaries.

pub mod tracing_setup;
