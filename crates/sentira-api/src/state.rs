//! Application state wiring the pipeline and report engine to their
//! concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use sentira_core::analytics::ReportEngine;
use sentira_core::pipeline::InteractionPipeline;
use sentira_core::repository::UserRepository;
use sentira_infra::llm::{LlmConfig, OpenAiCompatClient};
use sentira_infra::render::PlaceholderChartRenderer;
use sentira_infra::sqlite::{DatabasePool, SqliteStore};
use sentira_types::error::RepositoryError;
use sentira_types::report::UserStatistics;

pub type ConcretePipeline = InteractionPipeline<OpenAiCompatClient, SqliteStore>;
pub type ConcreteReportEngine = ReportEngine<SqliteStore, PlaceholderChartRenderer>;

/// Shared application state used by REST handlers and CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ConcretePipeline>,
    pub reports: Arc<ConcreteReportEngine>,
    pub store: SqliteStore,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Connect to the database, build the chat client, and wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("sentira.db").display()
        );
        let pool = DatabasePool::new(&db_url).await?;
        let store = SqliteStore::new(pool);

        let config = LlmConfig::from_env()?;
        let client = OpenAiCompatClient::new(config)?;

        let pipeline = Arc::new(InteractionPipeline::new(client, store.clone()));
        let reports = Arc::new(ReportEngine::new(store.clone(), PlaceholderChartRenderer));

        Ok(Self {
            pipeline,
            reports,
            store,
            data_dir,
        })
    }

    pub async fn statistics(&self, user_id: &str) -> Result<UserStatistics, RepositoryError> {
        self.store.get_statistics(user_id).await
    }
}

fn resolve_data_dir() -> PathBuf {
    std::env::var("SENTIRA_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".sentira")
        })
}
