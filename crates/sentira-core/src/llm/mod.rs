pub mod client;
pub mod extract;

pub use client::ChatClient;
pub use extract::{extract_json, Extracted};
