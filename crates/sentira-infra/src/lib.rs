//! Adapters behind the core's ports: the SQLite store, the
//! OpenAI-compatible chat client, and the placeholder chart renderer.

pub mod llm;
pub mod render;
pub mod sqlite;
