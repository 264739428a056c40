//! Repository set selected from configuration.

use std::sync::Arc;

use tracing::info;

use mediavault_core::config::DatabaseConfig;
use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    FileRepository, FolderRepository, PgFileRepository, PgFolderRepository,
};

/// The folder and file repositories for the configured backend.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Folder persistence.
    pub folders: Arc<dyn FolderRepository>,
    /// File record persistence.
    pub files: Arc<dyn FileRepository>,
    /// The PostgreSQL pool, when that backend is in use.
    pool: Option<DatabasePool>,
}

impl Repositories {
    /// Build the repositories for `config.provider`.
    ///
    /// The `postgres` provider connects and applies pending migrations
    /// before returning.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let db = DatabasePool::connect(config).await?;
                run_migrations(&db).await?;
                Ok(Self {
                    folders: Arc::new(PgFolderRepository::new(db.pool().clone())),
                    files: Arc::new(PgFileRepository::new(db.pool().clone())),
                    pool: Some(db),
                })
            }
            "memory" => {
                info!("Using in-memory folder and file repositories");
                Ok(Self::memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Fresh in-memory repositories sharing one store.
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            folders: Arc::new(store.folders()),
            files: Arc::new(store.files()),
            pool: None,
        }
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release backend connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
