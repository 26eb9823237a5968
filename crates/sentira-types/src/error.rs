use thiserror::Error;

/// Errors from the structured-completion client.
///
/// Transport and retry-exhaustion errors are fatal to the calling pipeline
/// stage; validation errors are raised before any network call is made.
/// Shape errors never appear here -- malformed response content is handled
/// by the extraction fallback, not by an error.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl LlmError {
    /// Whether this error was raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, LlmError::Validation(_))
    }
}

/// Errors from repository operations (used by trait definitions in sentira-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by a pipeline invocation.
///
/// A pipeline run either returns a complete structured result or exactly one
/// of these; degraded (fallback) stage results are successes, not errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
