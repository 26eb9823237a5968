//! Configuration for the OpenAI-compatible chat endpoint.

use secrecy::SecretString;
use sentira_types::error::LlmError;

const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
const DEFAULT_TEXT_MODEL: &str = "qwen-turbo";
const DEFAULT_VISION_MODEL: &str = "qwen-vl-max-latest";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Endpoint settings. No Debug derive: the key must not leak into logs.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first failure.
    pub max_retries: u32,
}

impl LlmConfig {
    /// Read settings from the environment. The API key comes from
    /// `DASHSCOPE_API_KEY`, or `OPENAI_API_KEY` as a fallback.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("DASHSCOPE_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| {
                LlmError::Validation(
                    "no API key set; export DASHSCOPE_API_KEY or OPENAI_API_KEY".to_string(),
                )
            })?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: std::env::var("SENTIRA_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            text_model: std::env::var("SENTIRA_TEXT_MODEL")
                .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            vision_model: std::env::var("SENTIRA_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_key(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().into(),
            base_url: base_url.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}
