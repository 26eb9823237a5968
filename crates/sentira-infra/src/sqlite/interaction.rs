//! Interaction log and emotion analysis persistence.

use chrono::{DateTime, Utc};
use sentira_core::repository::InteractionRepository;
use sentira_types::emotion::EmotionAnalysisRecord;
use sentira_types::error::RepositoryError;
use sentira_types::interaction::InteractionLog;
use sqlx::FromRow;
use uuid::Uuid;

use super::{encode_json, map_sqlx, SqliteStore};

#[derive(FromRow)]
struct InteractionLogRow {
    log_id: String,
    user_id: String,
    timestamp: String,
    input_type: String,
    detected_emotion: String,
    emotion_category: String,
    raw_input: String,
    metadata: String,
}

impl InteractionLogRow {
    fn into_log(self) -> Option<InteractionLog> {
        let log = InteractionLog {
            id: Uuid::parse_str(&self.log_id).ok()?,
            user_id: self.user_id,
            timestamp: DateTime::parse_from_rfc3339(&self.timestamp)
                .ok()?
                .with_timezone(&Utc),
            input_type: self.input_type.parse().ok()?,
            detected_emotion: serde_json::from_str(&self.detected_emotion).ok()?,
            emotion: serde_json::from_str(&self.emotion_category).ok()?,
            raw_input: serde_json::from_str(&self.raw_input).ok()?,
            metadata: serde_json::from_str(&self.metadata).ok()?,
        };
        Some(log)
    }
}

#[derive(FromRow)]
struct EmotionAnalysisRow {
    analysis_id: String,
    interaction_log_id: String,
    pad_values: String,
    emotion_category: String,
    confidence: f64,
    analysis_method: String,
    created_at: String,
}

impl EmotionAnalysisRow {
    fn into_record(self) -> Option<EmotionAnalysisRecord> {
        let record = EmotionAnalysisRecord {
            id: Uuid::parse_str(&self.analysis_id).ok()?,
            interaction_log_id: Uuid::parse_str(&self.interaction_log_id).ok()?,
            pad_values: serde_json::from_str(&self.pad_values).ok()?,
            emotion_category: serde_json::from_str(&self.emotion_category).ok()?,
            confidence: self.confidence,
            analysis_method: self.analysis_method.parse().ok()?,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)
                .ok()?
                .with_timezone(&Utc),
        };
        Some(record)
    }
}

fn collect_logs(rows: Vec<InteractionLogRow>) -> Vec<InteractionLog> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.log_id.clone();
            let log = row.into_log();
            if log.is_none() {
                tracing::warn!(log_id = %id, "skipping malformed interaction_logs row");
            }
            log
        })
        .collect()
}

impl InteractionRepository for SqliteStore {
    async fn insert_log(&self, log: &InteractionLog) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO interaction_logs
                 (log_id, user_id, timestamp, input_type, detected_emotion,
                  emotion_category, raw_input, metadata)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(log.id.to_string())
        .bind(&log.user_id)
        .bind(log.timestamp.to_rfc3339())
        .bind(log.input_type.to_string())
        .bind(encode_json(&log.detected_emotion)?)
        .bind(encode_json(&log.emotion)?)
        .bind(encode_json(&log.raw_input)?)
        .bind(encode_json(&log.metadata)?)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn insert_analysis(
        &self,
        analysis: &EmotionAnalysisRecord,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO emotion_analysis
                 (analysis_id, interaction_log_id, pad_values, emotion_category,
                  confidence, analysis_method, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(analysis.id.to_string())
        .bind(analysis.interaction_log_id.to_string())
        .bind(encode_json(&analysis.pad_values)?)
        .bind(encode_json(&analysis.emotion_category)?)
        .bind(analysis.confidence)
        .bind(analysis.analysis_method.to_string())
        .bind(analysis.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn get_analysis(
        &self,
        log_id: Uuid,
    ) -> Result<Option<EmotionAnalysisRecord>, RepositoryError> {
        let row: Option<EmotionAnalysisRow> =
            sqlx::query_as("SELECT * FROM emotion_analysis WHERE interaction_log_id = ?")
                .bind(log_id.to_string())
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;
        match row {
            None => Ok(None),
            Some(row) => {
                let id = row.analysis_id.clone();
                match row.into_record() {
                    Some(record) => Ok(Some(record)),
                    None => {
                        tracing::warn!(analysis_id = %id, "skipping malformed emotion_analysis row");
                        Ok(None)
                    }
                }
            }
        }
    }

    async fn recent_logs(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<InteractionLog>, RepositoryError> {
        let rows: Vec<InteractionLogRow> = sqlx::query_as(
            "SELECT * FROM interaction_logs
             WHERE user_id = ? ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;
        Ok(collect_logs(rows))
    }

    async fn logs_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<InteractionLog>, RepositoryError> {
        let rows: Vec<InteractionLogRow> = sqlx::query_as(
            "SELECT * FROM interaction_logs
             WHERE user_id = ? AND timestamp >= ?
             ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(since.to_rfc3339())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;
        Ok(collect_logs(rows))
    }

    async fn patch_metadata(
        &self,
        log_id: Uuid,
        patch: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE interaction_logs
             SET metadata = json_patch(metadata, ?)
             WHERE log_id = ?",
        )
        .bind(encode_json(patch)?)
        .bind(log_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::store;
    use super::*;
    use chrono::Duration;
    use sentira_core::repository::UserRepository;
    use sentira_types::emotion::{EmotionAssessment, EmotionCategory, PadValues};
    use sentira_types::interaction::{InputModality, RawInput};
    use serde_json::json;

    fn log(user_id: &str, at: DateTime<Utc>) -> InteractionLog {
        InteractionLog {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            timestamp: at,
            input_type: InputModality::Text,
            detected_emotion: PadValues::neutral(),
            emotion: EmotionCategory::default(),
            raw_input: RawInput {
                text: "hello".to_string(),
                image_description: None,
            },
            metadata: json!({}),
        }
    }

    #[tokio::test]
    async fn test_log_and_analysis_roundtrip() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();

        let log = log("u1", Utc::now());
        store.insert_log(&log).await.unwrap();
        store
            .insert_analysis(&EmotionAnalysisRecord::from_assessment(
                log.id,
                &EmotionAssessment::fallback(),
            ))
            .await
            .unwrap();

        let logs = store.recent_logs("u1", 10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, log.id);
        assert_eq!(logs[0].raw_input.text, "hello");

        let analysis = store.get_analysis(log.id).await.unwrap().unwrap();
        assert_eq!(analysis.interaction_log_id, log.id);
        assert_eq!(analysis.pad_values, PadValues::neutral());
        assert_eq!(analysis.confidence, 0.0);

        assert!(store.get_analysis(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logs_since_window() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();

        let now = Utc::now();
        store.insert_log(&log("u1", now - Duration::days(10))).await.unwrap();
        store.insert_log(&log("u1", now - Duration::days(1))).await.unwrap();
        store.insert_log(&log("u1", now)).await.unwrap();

        let logs = store
            .logs_since("u1", now - Duration::days(7), 100)
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
        // Newest first.
        assert!(logs[0].timestamp > logs[1].timestamp);
    }

    #[tokio::test]
    async fn test_recent_logs_skips_malformed_rows() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();

        let good = log("u1", Utc::now());
        store.insert_log(&good).await.unwrap();

        // A row with an unparsable timestamp, written behind the repository's back.
        sqlx::query(
            "INSERT INTO interaction_logs
                 (log_id, user_id, timestamp, input_type, detected_emotion,
                  emotion_category, raw_input, metadata)
             VALUES (?, ?, 'yesterday-ish', 'text', '{}', '{}', '{\"text\":\"x\"}', '{}')",
        )
        .bind(Uuid::now_v7().to_string())
        .bind("u1")
        .execute(&store.pool.writer)
        .await
        .unwrap();

        let logs = store.recent_logs("u1", 10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, good.id);
    }

    #[tokio::test]
    async fn test_patch_metadata_merges_keys() {
        let (_dir, store) = store().await;
        store.ensure_profile("u1").await.unwrap();

        let mut entry = log("u1", Utc::now());
        entry.metadata = json!({"origin": "test"});
        store.insert_log(&entry).await.unwrap();

        store
            .patch_metadata(entry.id, &json!({"assistant_reply": "hi there"}))
            .await
            .unwrap();

        let logs = store.recent_logs("u1", 1).await.unwrap();
        assert_eq!(logs[0].metadata["origin"], "test");
        assert_eq!(logs[0].metadata["assistant_reply"], "hi there");
    }

    #[tokio::test]
    async fn test_patch_metadata_missing_log() {
        let (_dir, store) = store().await;
        let err = store
            .patch_metadata(Uuid::now_v7(), &json!({"k": "v"}))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
