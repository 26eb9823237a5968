//! Chat request/response types for the structured-completion client.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Role of a message in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single text message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Result of one completion call: the text content plus the raw response
/// body, retained for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub content: String,
    pub raw: serde_json::Value,
}

/// Image formats accepted by the multimodal endpoint.
///
/// Parsing normalizes common aliases (jpg/jpe -> jpeg, tif -> tiff) before
/// validation; anything outside the allow-list is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Webp,
    Heic,
    Tiff,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "jpeg"),
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Bmp => write!(f, "bmp"),
            ImageFormat::Webp => write!(f, "webp"),
            ImageFormat::Heic => write!(f, "heic"),
            ImageFormat::Tiff => write!(f, "tiff"),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" | "jpe" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "bmp" => Ok(ImageFormat::Bmp),
            "webp" => Ok(ImageFormat::Webp),
            "heic" => Ok(ImageFormat::Heic),
            "tiff" | "tif" => Ok(ImageFormat::Tiff),
            other => Err(format!("unsupported image format: '{other}'")),
        }
    }
}

/// A base64-encoded image attachment, tagged with its declared format.
///
/// The format is kept as the caller-supplied string; it is parsed and
/// validated by the client before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub base64_data: String,
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_image_format_aliases() {
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("jpe".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("tif".parse::<ImageFormat>().unwrap(), ImageFormat::Tiff);
        assert_eq!("WebP".parse::<ImageFormat>().unwrap(), ImageFormat::Webp);
    }

    #[test]
    fn test_image_format_rejects_unknown() {
        assert!("gif".parse::<ImageFormat>().is_err());
        assert!("svg".parse::<ImageFormat>().is_err());
        assert!("".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn test_chat_message_constructors() {
        let msg = ChatMessage::system("be terse");
        assert_eq!(msg.role, MessageRole::System);
        assert_eq!(msg.content, "be terse");
        assert_eq!(ChatMessage::user("hi").role, MessageRole::User);
        assert_eq!(ChatMessage::assistant("hello").role, MessageRole::Assistant);
    }
}
