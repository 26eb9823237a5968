//! Core domain logic: the interaction pipeline, the analytics engine, and
//! the ports they speak through.

pub mod analytics;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod repository;
