//! Chat client for OpenAI-compatible completion endpoints.
//!
//! Transient failures are retried with increasing backoff plus random
//! jitter. Authentication failures short-circuit the retry loop. Image
//! payloads are validated (format allow-list, decodable base64) before any
//! network call.

use base64::Engine;
use rand::Rng;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use sentira_core::llm::ChatClient;
use sentira_types::error::LlmError;
use sentira_types::llm::{ChatMessage, ChatOutcome, ImageAttachment, ImageFormat};

use super::LlmConfig;

// No Debug derive: holds the API key.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: WireContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    ImageUrl { image_url: ImageUrlPart },
    Text { text: String },
}

#[derive(Serialize)]
struct ImageUrlPart {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Build a `data:` URL from a validated attachment.
fn data_url(image: &ImageAttachment) -> Result<String, LlmError> {
    let format: ImageFormat = image
        .format
        .parse()
        .map_err(|e: String| LlmError::Validation(e))?;
    base64::engine::general_purpose::STANDARD
        .decode(&image.base64_data)
        .map_err(|e| LlmError::Validation(format!("invalid base64 image payload: {e}")))?;
    Ok(format!(
        "data:image/{format};base64,{data}",
        data = image.base64_data
    ))
}

impl OpenAiCompatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn execute(
        &self,
        model: &str,
        messages: Vec<WireMessage>,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<ChatOutcome, LlmError> {
        let body = ChatRequest {
            model,
            messages,
            temperature,
            max_tokens,
        };
        let mut last_error = String::new();
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_secs(u64::from(attempt + 1) * 2);
                let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
                tokio::time::sleep(backoff + jitter).await;
            }
            match self.try_once(&body).await {
                Ok(outcome) => return Ok(outcome),
                Err(LlmError::AuthenticationFailed) => return Err(LlmError::AuthenticationFailed),
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "completion request failed");
                    last_error = err.to_string();
                }
            }
        }
        Err(LlmError::RetriesExhausted {
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }

    async fn try_once(&self, body: &ChatRequest<'_>) -> Result<ChatOutcome, LlmError> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(LlmError::AuthenticationFailed);
        }
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| LlmError::Deserialization(e.to_string()))?;
        let parsed: ChatResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::Deserialization(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Deserialization("response carried no choices".to_string()))?;
        Ok(ChatOutcome { content, raw })
    }
}

impl ChatClient for OpenAiCompatClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<ChatOutcome, LlmError> {
        let wire = messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.to_string(),
                content: WireContent::Text(m.content.clone()),
            })
            .collect();
        self.execute(&self.config.text_model, wire, temperature, max_tokens)
            .await
    }

    async fn chat_with_image(
        &self,
        prompt: &str,
        image: &ImageAttachment,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<ChatOutcome, LlmError> {
        let url = data_url(image)?;
        let wire = vec![WireMessage {
            role: "user".to_string(),
            content: WireContent::Parts(vec![
                ContentPart::ImageUrl {
                    image_url: ImageUrlPart { url },
                },
                ContentPart::Text {
                    text: prompt.to_string(),
                },
            ]),
        }];
        self.execute(&self.config.vision_model, wire, temperature, max_tokens)
            .await
    }

    async fn is_available(&self) -> bool {
        self.chat(&[ChatMessage::user("ping")], 0.0, 1).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(format: &str, data: &str) -> ImageAttachment {
        ImageAttachment {
            base64_data: data.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_data_url_normalizes_aliases() {
        let url = data_url(&attachment("jpg", "aGVsbG8=")).unwrap();
        assert_eq!(url, "data:image/jpeg;base64,aGVsbG8=");
        let url = data_url(&attachment("tif", "aGVsbG8=")).unwrap();
        assert!(url.starts_with("data:image/tiff;base64,"));
    }

    #[test]
    fn test_unsupported_format_fails_fast() {
        let err = data_url(&attachment("gif", "aGVsbG8=")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_undecodable_payload_fails_fast() {
        let err = data_url(&attachment("png", "not-base64!!")).unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_invalid_image_never_hits_network() {
        // Unroutable endpoint: a network attempt would error as transport,
        // not validation.
        let client =
            OpenAiCompatClient::new(LlmConfig::with_key("k", "http://127.0.0.1:1")).unwrap();
        let err = client
            .chat_with_image("describe", &attachment("svg", "aGVsbG8="), 0.5, 10)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_multimodal_wire_shape() {
        let message = WireMessage {
            role: "user".to_string(),
            content: WireContent::Parts(vec![
                ContentPart::ImageUrl {
                    image_url: ImageUrlPart {
                        url: "data:image/png;base64,AA==".to_string(),
                    },
                },
                ContentPart::Text {
                    text: "what is this".to_string(),
                },
            ]),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"][0]["type"], "image_url");
        assert_eq!(json["content"][0]["image_url"]["url"], "data:image/png;base64,AA==");
        assert_eq!(json["content"][1]["type"], "text");
    }

    #[test]
    fn test_response_content_extraction() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }
}
