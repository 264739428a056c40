//! In-memory blob storage.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;
use mediavault_core::traits::storage::BlobStorage;

use super::{check_storage_ref, new_storage_ref};

/// Blob storage kept in a concurrent map. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBlobStorage {
    blobs: DashMap<String, Bytes>,
}

impl MemoryBlobStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStorage for MemoryBlobStorage {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn store(&self, file_name: &str, data: Bytes) -> AppResult<String> {
        let storage_ref = new_storage_ref(file_name);
        debug!(storage_ref = %storage_ref, bytes = data.len(), "Stored blob in memory");
        self.blobs.insert(storage_ref.clone(), data);
        Ok(storage_ref)
    }

    async fn read(&self, storage_ref: &str) -> AppResult<Bytes> {
        check_storage_ref(storage_ref)?;
        self.blobs
            .get(storage_ref)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {storage_ref}")))
    }

    async fn delete(&self, storage_ref: &str) -> AppResult<()> {
        check_storage_ref(storage_ref)?;
        self.blobs.remove(storage_ref);
        Ok(())
    }

    async fn exists(&self, storage_ref: &str) -> AppResult<bool> {
        check_storage_ref(storage_ref)?;
        Ok(self.blobs.contains_key(storage_ref))
    }
}
