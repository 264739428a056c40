//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mediavault_entity::file::EntityRef;
use mediavault_entity::folder::Folder;
use mediavault_service::FileDetails;

/// The folder fields embedded in a file response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderSummary {
    /// Folder ID.
    pub id: i64,
    /// Folder uid.
    pub uid: Uuid,
    /// Folder name.
    pub name: String,
    /// Folder path.
    pub path: String,
}

impl From<Folder> for FolderSummary {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            uid: folder.uid,
            name: folder.name,
            path: folder.path,
        }
    }
}

/// A file as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File ID.
    pub id: i64,
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime: Option<String>,
    /// Size in bytes.
    pub size: i64,
    /// Path of the folder at association time.
    pub folder_path: String,
    /// The current folder, if the file still has one.
    pub folder: Option<FolderSummary>,
    /// The entry the file is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<EntityRef>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl From<FileDetails> for FileResponse {
    fn from(details: FileDetails) -> Self {
        let related = details.file.related();
        let file = details.file;
        Self {
            id: file.id,
            name: file.name,
            mime: file.mime_type,
            size: file.size_bytes,
            folder_path: file.folder_path,
            folder: details.folder.map(FolderSummary::from),
            related,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

/// A list of folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderListResponse {
    /// The folders.
    pub results: Vec<Folder>,
}

/// Bulk delete outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    /// Number of folders removed, descendants included.
    pub deleted: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every backend answers, otherwise `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Whether folder/file persistence is reachable.
    pub database: bool,
    /// Whether blob storage is reachable.
    pub storage: bool,
}
