//! Port for the chat-completion backend.

use sentira_types::error::LlmError;
use sentira_types::llm::{ChatMessage, ChatOutcome, ImageAttachment};

/// A chat-completion backend. The pipeline only ever needs plain text
/// completions and image-grounded completions; structured extraction is
/// layered on top in [`super::extract`].
pub trait ChatClient: Send + Sync {
    /// Run a chat completion over the given messages.
    fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> impl std::future::Future<Output = Result<ChatOutcome, LlmError>> + Send;

    /// Run a multimodal completion: a text prompt grounded on one image.
    fn chat_with_image(
        &self,
        prompt: &str,
        image: &ImageAttachment,
        temperature: f64,
        max_tokens: u32,
    ) -> impl std::future::Future<Output = Result<ChatOutcome, LlmError>> + Send;

    /// Cheap probe: can the backend answer at all right now?
    fn is_available(&self) -> impl std::future::Future<Output = bool> + Send;
}
