//! Memory events and the entity map extracted from each interaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::emotion::{EmotionCategory, EmotionLabel, PadValues};

/// Named entities pulled from one interaction, grouped by kind. Any field
/// may be empty; extraction failures yield the all-empty default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityMap {
    #[serde(default)]
    pub persons: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub time_expressions: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
}

impl EntityMap {
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
            && self.locations.is_empty()
            && self.time_expressions.is_empty()
            && self.events.is_empty()
            && self.organizations.is_empty()
    }
}

/// Emotion snapshot attached to a memory at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionAnnotation {
    pub pad_values: PadValues,
    pub emotion_category: EmotionCategory,
}

/// A durable memory record distilled from one interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEvent {
    pub id: Uuid,
    pub user_id: String,
    pub interaction_log_id: Uuid,
    pub emotion_annotation: EmotionAnnotation,
    pub linked_topic: String,
    pub memory_type: EmotionLabel,
    pub importance_score: f64,
    pub tags: Vec<String>,
    pub entities: EntityMap,
    pub created_at: DateTime<Utc>,
}

impl MemoryEvent {
    /// Clamp importance into [0, 1].
    pub fn clamp_importance(score: f64) -> f64 {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_map_default_is_empty() {
        let map = EntityMap::default();
        assert!(map.is_empty());
    }

    #[test]
    fn test_entity_map_partial_json() {
        let map: EntityMap =
            serde_json::from_str(r#"{"persons":["Alice"],"events":["birthday"]}"#).unwrap();
        assert_eq!(map.persons, vec!["Alice"]);
        assert_eq!(map.events, vec!["birthday"]);
        assert!(map.locations.is_empty());
        assert!(!map.is_empty());
    }

    #[test]
    fn test_clamp_importance() {
        assert_eq!(MemoryEvent::clamp_importance(1.5), 1.0);
        assert_eq!(MemoryEvent::clamp_importance(-0.2), 0.0);
        assert_eq!(MemoryEvent::clamp_importance(0.7), 0.7);
    }
}
