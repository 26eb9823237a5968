mod config;
mod openai_compat;

pub use config::LlmConfig;
pub use openai_compat::OpenAiCompatClient;
