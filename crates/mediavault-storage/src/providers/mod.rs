//! Blob storage provider implementations.

#[cfg(feature = "local")]
pub mod local;
pub mod memory;

#[cfg(feature = "local")]
pub use local::LocalBlobStorage;
pub use memory::MemoryBlobStorage;

use uuid::Uuid;

use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;

/// Generate a fresh storage reference, keeping the file name's extension.
///
/// References look like `ab/ab12…ef.png`: the first two hex digits of the
/// blob id shard the objects across directories.
pub(crate) fn new_storage_ref(file_name: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{}/{id}{extension}", &id[..2])
}

/// Reject references that could escape the storage root.
pub(crate) fn check_storage_ref(storage_ref: &str) -> AppResult<()> {
    let escapes = storage_ref.is_empty()
        || storage_ref.starts_with('/')
        || storage_ref.contains('\\')
        || storage_ref.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if escapes {
        return Err(AppError::validation(format!(
            "Invalid storage reference: '{storage_ref}'"
        )));
    }
    Ok(())
}
