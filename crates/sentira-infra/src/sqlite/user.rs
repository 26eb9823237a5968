//! User profile persistence and per-user statistics.

use chrono::{DateTime, Utc};
use sentira_core::repository::UserRepository;
use sentira_types::error::RepositoryError;
use sentira_types::profile::UserProfile;
use sentira_types::emotion::EmotionLabel;
use sentira_types::report::{EmotionTally, UserStatistics};
use sqlx::FromRow;

use super::{encode_json, map_sqlx, SqliteStore};

#[derive(FromRow)]
struct UserProfileRow {
    user_id: String,
    emotion_baseline: String,
    memory_tags: String,
    avatar_roles: String,
    created_at: String,
    updated_at: String,
}

impl UserProfileRow {
    fn into_profile(self) -> Option<UserProfile> {
        let parse = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc))
        };
        let profile = UserProfile {
            user_id: self.user_id,
            emotion_baseline: serde_json::from_str(&self.emotion_baseline).ok()?,
            memory_tags: serde_json::from_str(&self.memory_tags).ok()?,
            avatar_roles: serde_json::from_str(&self.avatar_roles).ok()?,
            created_at: parse(&self.created_at)?,
            updated_at: parse(&self.updated_at)?,
        };
        Some(profile)
    }
}

impl UserRepository for SqliteStore {
    async fn ensure_profile(&self, user_id: &str) -> Result<UserProfile, RepositoryError> {
        let profile = UserProfile::new(user_id);
        sqlx::query(
            "INSERT INTO user_profiles
                 (user_id, emotion_baseline, memory_tags, avatar_roles, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(&profile.user_id)
        .bind(encode_json(&profile.emotion_baseline)?)
        .bind(encode_json(&profile.memory_tags)?)
        .bind(encode_json(&profile.avatar_roles)?)
        .bind(profile.created_at.to_rfc3339())
        .bind(profile.updated_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        self.get_profile(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let row: Option<UserProfileRow> =
            sqlx::query_as("SELECT * FROM user_profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;
        match row {
            None => Ok(None),
            Some(row) => match row.into_profile() {
                Some(profile) => Ok(Some(profile)),
                None => {
                    tracing::warn!(user_id, "skipping malformed user_profiles row");
                    Ok(None)
                }
            },
        }
    }

    async fn get_statistics(&self, user_id: &str) -> Result<UserStatistics, RepositoryError> {
        let (interaction_count, first, last): (i64, Option<String>, Option<String>) =
            sqlx::query_as(
                "SELECT COUNT(*), MIN(timestamp), MAX(timestamp)
                 FROM interaction_logs WHERE user_id = ?",
            )
            .bind(user_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        let week_ago = (Utc::now() - chrono::Duration::days(7)).to_rfc3339();
        let (interactions_last_7_days,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM interaction_logs WHERE user_id = ? AND timestamp >= ?",
        )
        .bind(user_id)
        .bind(week_ago)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let (memory_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM memory_events WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;

        let type_counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT memory_type, COUNT(*) FROM memory_events WHERE user_id = ? GROUP BY memory_type",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;
        let mut memory_type_distribution = EmotionTally::default();
        for (memory_type, count) in type_counts {
            match memory_type.parse::<EmotionLabel>() {
                Ok(EmotionLabel::Positive) => memory_type_distribution.positive = count as usize,
                Ok(EmotionLabel::Negative) => memory_type_distribution.negative = count as usize,
                Ok(EmotionLabel::Neutral) => memory_type_distribution.neutral = count as usize,
                Err(_) => tracing::warn!(memory_type, "unknown memory_type in distribution"),
            }
        }

        let (persona_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM personas WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;

        let parse = |s: Option<String>| {
            s.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|d| d.with_timezone(&Utc))
        };

        Ok(UserStatistics {
            user_id: user_id.to_string(),
            interaction_count,
            interactions_last_7_days,
            memory_count,
            memory_type_distribution,
            persona_count,
            first_interaction: parse(first),
            last_interaction: parse(last),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::store;
    use super::*;

    #[tokio::test]
    async fn test_ensure_profile_is_idempotent() {
        let (_dir, store) = store().await;
        let first = store.ensure_profile("u1").await.unwrap();
        let second = store.ensure_profile("u1").await.unwrap();
        assert_eq!(first.user_id, "u1");
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(first.memory_tags, vec!["positive", "negative", "neutral"]);
    }

    #[tokio::test]
    async fn test_get_profile_missing_user() {
        let (_dir, store) = store().await;
        assert!(store.get_profile("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_statistics_for_fresh_user() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();
        let stats = store.get_statistics("u1").await.unwrap();
        assert_eq!(stats.interaction_count, 0);
        assert_eq!(stats.interactions_last_7_days, 0);
        assert_eq!(stats.memory_count, 0);
        assert_eq!(stats.memory_type_distribution, EmotionTally::default());
        assert_eq!(stats.persona_count, 0);
        assert!(stats.first_interaction.is_none());
    }

    #[tokio::test]
    async fn test_statistics_counts_recent_activity() {
        use chrono::Duration;
        use sentira_core::repository::{InteractionRepository, MemoryRepository};
        use sentira_types::emotion::{EmotionCategory, PadValues};
        use sentira_types::interaction::{InputModality, InteractionLog, RawInput};
        use sentira_types::memory::{EmotionAnnotation, EntityMap, MemoryEvent};
        use serde_json::json;
        use uuid::Uuid;

        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();

        let log = |at| InteractionLog {
            id: Uuid::now_v7(),
            user_id: "u1".to_string(),
            timestamp: at,
            input_type: InputModality::Text,
            detected_emotion: PadValues::neutral(),
            emotion: EmotionCategory::default(),
            raw_input: RawInput {
                text: "hi".to_string(),
                image_description: None,
            },
            metadata: json!({}),
        };
        let now = Utc::now();
        let recent = log(now);
        store.insert_log(&log(now - Duration::days(20))).await.unwrap();
        store.insert_log(&recent).await.unwrap();

        store
            .insert_memory(&MemoryEvent {
                id: Uuid::now_v7(),
                user_id: "u1".to_string(),
                interaction_log_id: recent.id,
                emotion_annotation: EmotionAnnotation {
                    pad_values: PadValues::neutral(),
                    emotion_category: EmotionCategory::default(),
                },
                linked_topic: "a good day".to_string(),
                memory_type: EmotionLabel::Positive,
                importance_score: 0.6,
                tags: vec!["positive".to_string()],
                entities: EntityMap::default(),
                created_at: now,
            })
            .await
            .unwrap();

        let stats = store.get_statistics("u1").await.unwrap();
        assert_eq!(stats.interaction_count, 2);
        assert_eq!(stats.interactions_last_7_days, 1);
        assert_eq!(stats.memory_count, 1);
        assert_eq!(stats.memory_type_distribution.positive, 1);
        assert!(stats.first_interaction.unwrap() < stats.last_interaction.unwrap());
    }
}
