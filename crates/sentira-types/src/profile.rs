//! User profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::emotion::PadValues;

/// Per-user profile row, created on first contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub emotion_baseline: PadValues,
    pub memory_tags: Vec<String>,
    pub avatar_roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            emotion_baseline: PadValues {
                pleasure: 0.0,
                arousal: 0.0,
                dominance: 0.0,
            },
            memory_tags: vec![
                "positive".to_string(),
                "negative".to_string(),
                "neutral".to_string(),
            ],
            avatar_roles: vec!["friend".to_string()],
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let p = UserProfile::new("u1");
        assert_eq!(p.user_id, "u1");
        assert_eq!(p.emotion_baseline.pleasure, 0.0);
        assert_eq!(p.memory_tags.len(), 3);
        assert_eq!(p.avatar_roles, vec!["friend"]);
    }
}
