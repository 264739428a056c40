//! Blob storage selection from configuration.

use std::sync::Arc;

use tracing::info;

use mediavault_core::config::StorageConfig;
use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;
use mediavault_core::traits::storage::BlobStorage;

use crate::providers::MemoryBlobStorage;

/// Build the blob storage named by `config.provider`.
pub async fn build_blob_storage(config: &StorageConfig) -> AppResult<Arc<dyn BlobStorage>> {
    let storage: Arc<dyn BlobStorage> = match config.provider.as_str() {
        #[cfg(feature = "local")]
        "local" => {
            info!(root = %config.local.root_path, "Initializing local blob storage");
            Arc::new(crate::providers::LocalBlobStorage::new(&config.local.root_path).await?)
        }
        "memory" => {
            info!("Initializing in-memory blob storage");
            Arc::new(MemoryBlobStorage::new())
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider: '{other}'. Supported: local, memory"
            )));
        }
    };

    Ok(storage)
}
