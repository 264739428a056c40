//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use mediavault_core::config::AppConfig;
use mediavault_core::traits::storage::BlobStorage;
use mediavault_database::Repositories;
use mediavault_service::{
    DefaultFolderProvisioner, FileService, FolderService, UploadService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Folder and file repositories.
    pub repositories: Repositories,
    /// Blob storage backend.
    pub storage: Arc<dyn BlobStorage>,
    /// Default upload folder provisioner.
    pub provisioner: Arc<DefaultFolderProvisioner>,
    /// Folder management.
    pub folder_service: Arc<FolderService>,
    /// File lookups.
    pub file_service: Arc<FileService>,
    /// Upload orchestration.
    pub upload_service: Arc<UploadService>,
}

impl AppState {
    /// Wire the services on top of the given backends.
    pub fn new(config: AppConfig, repositories: Repositories, storage: Arc<dyn BlobStorage>) -> Self {
        let folders = Arc::clone(&repositories.folders);
        let files = Arc::clone(&repositories.files);

        let provisioner = Arc::new(DefaultFolderProvisioner::new(
            Arc::clone(&folders),
            config.upload.clone(),
        ));
        let folder_service = Arc::new(FolderService::new(Arc::clone(&folders)));
        let file_service = Arc::new(FileService::new(Arc::clone(&files), Arc::clone(&folders)));
        let upload_service = Arc::new(UploadService::new(
            files,
            folders,
            Arc::clone(&provisioner),
            Arc::clone(&storage),
            config.upload.clone(),
        ));

        Self {
            config: Arc::new(config),
            repositories,
            storage,
            provisioner,
            folder_service,
            file_service,
            upload_service,
        }
    }
}
