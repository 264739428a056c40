//! Local filesystem blob storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use mediavault_core::error::{AppError, ErrorKind};
use mediavault_core::result::AppResult;
use mediavault_core::traits::storage::BlobStorage;

use super::{check_storage_ref, new_storage_ref};

/// Blob storage on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStorage {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a storage reference to an absolute path within the root.
    fn resolve(&self, storage_ref: &str) -> AppResult<PathBuf> {
        check_storage_ref(storage_ref)?;
        Ok(self.root.join(storage_ref))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create shard directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false))
    }

    async fn store(&self, file_name: &str, data: Bytes) -> AppResult<String> {
        let storage_ref = new_storage_ref(file_name);
        let full_path = self.resolve(&storage_ref)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {storage_ref}"),
                e,
            )
        })?;

        debug!(storage_ref = %storage_ref, bytes = data.len(), "Stored blob");
        Ok(storage_ref)
    }

    async fn read(&self, storage_ref: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(storage_ref)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {storage_ref}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {storage_ref}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, storage_ref: &str) -> AppResult<()> {
        let full_path = self.resolve(storage_ref)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(storage_ref = %storage_ref, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {storage_ref}"),
                e,
            )),
        }
    }

    async fn exists(&self, storage_ref: &str) -> AppResult<bool> {
        let full_path = self.resolve(storage_ref)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to check blob: {storage_ref}"),
                e,
            )
        })
    }
}
