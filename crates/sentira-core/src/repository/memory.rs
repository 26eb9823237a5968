use chrono::{DateTime, Utc};
use sentira_types::error::RepositoryError;
use sentira_types::memory::MemoryEvent;

/// Memory event persistence.
pub trait MemoryRepository: Send + Sync {
    fn insert_memory(
        &self,
        memory: &MemoryEvent,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Most recent memories for a user, newest first.
    fn recent_memories(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryEvent>, RepositoryError>> + Send;

    /// Memories with `created_at >= since`, newest first, capped at `limit`.
    fn memories_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryEvent>, RepositoryError>> + Send;
}
