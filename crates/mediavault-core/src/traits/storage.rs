//! Blob storage trait for pluggable upload backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the backends that hold uploaded file contents.
///
/// The blob store only knows opaque storage references. Folder placement
/// and naming live in the metadata layer, so a blob never moves when its
/// folder is renamed or reparented. Implementations live in
/// `mediavault-storage`.
#[async_trait]
pub trait BlobStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Persist the given bytes and return the storage reference for them.
    ///
    /// `file_name` is only a hint for the stored object's extension.
    async fn store(&self, file_name: &str, data: Bytes) -> AppResult<String>;

    /// Read a stored blob into memory.
    async fn read(&self, storage_ref: &str) -> AppResult<Bytes>;

    /// Delete a stored blob. Deleting a missing blob is not an error.
    async fn delete(&self, storage_ref: &str) -> AppResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, storage_ref: &str) -> AppResult<bool>;
}
