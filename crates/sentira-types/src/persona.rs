//! Personas: the cast of recurring figures in a user's interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to the built-in companion persona every user starts with.
pub const DEFAULT_PERSONA_NAME: &str = "Companion";

/// How often a persona leans positive, negative, or neutral. Values are
/// fractions that roughly sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalTendencies {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl Default for EmotionalTendencies {
    fn default() -> Self {
        Self {
            positive: 0.33,
            negative: 0.33,
            neutral: 0.34,
        }
    }
}

/// A recurring figure, either mentioned by the user or the built-in
/// companion. `interaction_count` tracks how often this persona has
/// spoken a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub personality_traits: Vec<String>,
    pub communication_style: String,
    pub emotional_tendencies: EmotionalTendencies,
    pub avatar_type: String,
    pub interaction_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Persona {
    /// The companion persona created on first contact with a user.
    pub fn default_companion(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            name: DEFAULT_PERSONA_NAME.to_string(),
            description: "Your everyday companion".to_string(),
            personality_traits: vec![
                "friendly".to_string(),
                "patient".to_string(),
                "understanding".to_string(),
                "supportive".to_string(),
            ],
            communication_style: "warm".to_string(),
            emotional_tendencies: EmotionalTendencies::default(),
            avatar_type: "friend".to_string(),
            interaction_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_companion() {
        let p = Persona::default_companion("u1");
        assert_eq!(p.name, DEFAULT_PERSONA_NAME);
        assert_eq!(p.avatar_type, "friend");
        assert_eq!(p.interaction_count, 0);
        assert!(p.personality_traits.contains(&"supportive".to_string()));
    }

    #[test]
    fn test_tendencies_default_sums_to_one() {
        let t = EmotionalTendencies::default();
        assert!((t.positive + t.negative + t.neutral - 1.0).abs() < 1e-9);
    }
}
