//! Memory event persistence.

use chrono::{DateTime, Utc};
use sentira_core::repository::MemoryRepository;
use sentira_types::error::RepositoryError;
use sentira_types::memory::MemoryEvent;
use sqlx::FromRow;
use uuid::Uuid;

use super::{encode_json, map_sqlx, SqliteStore};

#[derive(FromRow)]
struct MemoryEventRow {
    memory_id: String,
    user_id: String,
    interaction_log_id: String,
    emotion_annotation: String,
    linked_topic: String,
    memory_type: String,
    importance_score: f64,
    tags: String,
    entities: String,
    created_at: String,
}

impl MemoryEventRow {
    fn into_memory(self) -> Option<MemoryEvent> {
        let memory = MemoryEvent {
            id: Uuid::parse_str(&self.memory_id).ok()?,
            user_id: self.user_id,
            interaction_log_id: Uuid::parse_str(&self.interaction_log_id).ok()?,
            emotion_annotation: serde_json::from_str(&self.emotion_annotation).ok()?,
            linked_topic: self.linked_topic,
            memory_type: self.memory_type.parse().ok()?,
            importance_score: self.importance_score,
            tags: serde_json::from_str(&self.tags).ok()?,
            entities: serde_json::from_str(&self.entities).ok()?,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)
                .ok()?
                .with_timezone(&Utc),
        };
        Some(memory)
    }
}

fn collect_memories(rows: Vec<MemoryEventRow>) -> Vec<MemoryEvent> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.memory_id.clone();
            let memory = row.into_memory();
            if memory.is_none() {
                tracing::warn!(memory_id = %id, "skipping malformed memory_events row");
            }
            memory
        })
        .collect()
}

impl MemoryRepository for SqliteStore {
    async fn insert_memory(&self, memory: &MemoryEvent) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO memory_events
                 (memory_id, user_id, interaction_log_id, emotion_annotation,
                  linked_topic, memory_type, importance_score, tags, entities, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(memory.id.to_string())
        .bind(&memory.user_id)
        .bind(memory.interaction_log_id.to_string())
        .bind(encode_json(&memory.emotion_annotation)?)
        .bind(&memory.linked_topic)
        .bind(memory.memory_type.to_string())
        .bind(memory.importance_score)
        .bind(encode_json(&memory.tags)?)
        .bind(encode_json(&memory.entities)?)
        .bind(memory.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn recent_memories(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<MemoryEvent>, RepositoryError> {
        let rows: Vec<MemoryEventRow> = sqlx::query_as(
            "SELECT * FROM memory_events
             WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;
        Ok(collect_memories(rows))
    }

    async fn memories_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<MemoryEvent>, RepositoryError> {
        let rows: Vec<MemoryEventRow> = sqlx::query_as(
            "SELECT * FROM memory_events
             WHERE user_id = ? AND created_at >= ?
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(since.to_rfc3339())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;
        Ok(collect_memories(rows))
    }
}
