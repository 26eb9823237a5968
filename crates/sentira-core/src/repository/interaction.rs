use chrono::{DateTime, Utc};
use sentira_types::emotion::EmotionAnalysisRecord;
use sentira_types::error::RepositoryError;
use sentira_types::interaction::InteractionLog;
use uuid::Uuid;

/// Interaction log persistence.
pub trait InteractionRepository: Send + Sync {
    fn insert_log(
        &self,
        log: &InteractionLog,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Persist the affect assessment paired 1:1 with a log.
    fn insert_analysis(
        &self,
        analysis: &EmotionAnalysisRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Read back the analysis for a log, if one was recorded.
    fn get_analysis(
        &self,
        log_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<EmotionAnalysisRecord>, RepositoryError>> + Send;

    /// Most recent logs for a user, newest first.
    fn recent_logs(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<InteractionLog>, RepositoryError>> + Send;

    /// Logs with `timestamp >= since`, newest first, capped at `limit`.
    fn logs_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<InteractionLog>, RepositoryError>> + Send;

    /// Merge extra keys into a log's metadata object. Used to attach the
    /// assistant reply and speaker after synthesis.
    fn patch_metadata(
        &self,
        log_id: Uuid,
        patch: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
