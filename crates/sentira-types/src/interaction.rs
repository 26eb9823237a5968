//! Interaction logs and the request/outcome envelope of the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::emotion::{EmotionAssessment, EmotionCategory, PadValues};
use crate::llm::ImageAttachment;
use crate::memory::{EntityMap, MemoryEvent};
use crate::persona::Persona;

/// How the raw input reached the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputModality {
    Text,
    Topic,
    Voice,
    Image,
}

impl fmt::Display for InputModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputModality::Text => write!(f, "text"),
            InputModality::Topic => write!(f, "topic"),
            InputModality::Voice => write!(f, "voice"),
            InputModality::Image => write!(f, "image"),
        }
    }
}

impl FromStr for InputModality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(InputModality::Text),
            "topic" => Ok(InputModality::Topic),
            "voice" => Ok(InputModality::Voice),
            "image" => Ok(InputModality::Image),
            other => Err(format!("invalid input modality: '{other}'")),
        }
    }
}

/// The input as it entered the pipeline. When an image was attached, the
/// grounded caption is kept alongside the text it was spliced into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
}

/// One persisted interaction: what the user said and what the system read
/// into it. The assistant reply and chosen speaker are patched into
/// `metadata` after synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionLog {
    pub id: Uuid,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub input_type: InputModality,
    pub detected_emotion: PadValues,
    pub emotion: EmotionCategory,
    pub raw_input: RawInput,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Incoming request to run one interaction through the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionRequest {
    pub user_id: String,
    pub text: String,
    #[serde(default = "default_input_type")]
    pub input_type: InputModality,
    #[serde(default)]
    pub image: Option<ImageAttachment>,
    #[serde(default)]
    pub persona_id: Option<Uuid>,
}

fn default_input_type() -> InputModality {
    InputModality::Topic
}

/// The persona that voiced the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerPersona {
    pub persona_id: Uuid,
    pub name: String,
    pub avatar_type: String,
}

/// Synthesized reply plus the context that shaped it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyOutcome {
    pub reply: String,
    pub speaker: SpeakerPersona,
    pub used_memories: Vec<Uuid>,
    pub raw_response: serde_json::Value,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionOutcome {
    pub interaction_log_id: Uuid,
    pub pad_analysis: EmotionAssessment,
    pub entities: EntityMap,
    pub new_personas: Vec<Persona>,
    pub updated_personas: Vec<Persona>,
    pub memory: MemoryEvent,
    pub reply: ReplyOutcome,
    pub timestamp: DateTime<Utc>,
}
