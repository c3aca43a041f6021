use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use trellis_agent::llm::HttpLlmClient;
use trellis_agent::runtime::ChatRuntime;
use trellis_agent::session::SessionStore;
use trellis_core::catalog::{Catalog, CatalogSource};
use trellis_core::config::{AppConfig, ConfigError, LoadOptions};
use trellis_db::repositories::{SqlStoreItemRepository, SqlSuggestionSetRepository};
use trellis_db::{connect_with_settings, migrations, DbPool};

use crate::api::ApiState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub catalog: Arc<Catalog>,
    pub chat: Arc<ChatRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("llm client construction failed: {0}")]
    LlmClient(String),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        session_id = "unknown",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        session_id = "unknown",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        session_id = "unknown",
        "database migrations applied"
    );

    let (catalog, source) = Catalog::load_or_embedded(&config.catalog.path);
    match &source {
        CatalogSource::File(path) => {
            info!(
                event_name = "system.bootstrap.catalog_loaded",
                correlation_id = "bootstrap",
                session_id = "unknown",
                path = %path.display(),
                plants = catalog.len(),
                "plant catalog loaded from file"
            );
        }
        CatalogSource::Embedded { reason } => {
            warn!(
                event_name = "system.bootstrap.catalog_degraded",
                correlation_id = "bootstrap",
                session_id = "unknown",
                reason = %reason,
                plants = catalog.len(),
                "plant catalog unavailable; serving the embedded seed list"
            );
        }
    }
    let catalog = Arc::new(catalog);

    let llm = HttpLlmClient::from_config(&config.llm)
        .map_err(|error| BootstrapError::LlmClient(error.to_string()))?;
    let sessions = SessionStore::new(config.chat.session_ttl_secs, config.chat.max_turns);
    let chat = Arc::new(ChatRuntime::new(Arc::new(llm), sessions, catalog.clone()));

    Ok(Application { config, db_pool, catalog, chat })
}

impl Application {
    pub fn api_state(&self) -> ApiState {
        ApiState {
            suggestion_sets: Arc::new(SqlSuggestionSetRepository::new(self.db_pool.clone())),
            store_items: Arc::new(SqlStoreItemRepository::new(self.db_pool.clone())),
            catalog: self.catalog.clone(),
            chat: self.chat.clone(),
            mailer: Arc::new(crate::mail::Mailer::new()),
        }
    }
}
