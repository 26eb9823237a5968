//! SQLite-backed implementation of the core repository traits.
//!
//! One [`SqliteStore`] implements all four traits; each trait's impl lives
//! in its own file. Rows store structured fields as JSON text and
//! timestamps as RFC 3339 strings. Malformed rows found during list reads
//! are logged and skipped rather than failing the whole query.

mod interaction;
mod memory;
mod persona;
mod pool;
mod user;

pub use pool::DatabasePool;

use sentira_types::error::RepositoryError;

/// SQLite store behind every repository port.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DatabasePool,
}

impl SqliteStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

pub(crate) fn map_sqlx(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(err.to_string())
}

pub(crate) fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Query(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub async fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteStore::new(pool))
    }
}
