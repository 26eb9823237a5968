//! Shared domain types for Sentira.

pub mod emotion;
pub mod error;
pub mod interaction;
pub mod llm;
pub mod memory;
pub mod persona;
pub mod profile;
pub mod report;
