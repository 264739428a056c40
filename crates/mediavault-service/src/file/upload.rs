//! Upload orchestration: pick the destination folder, store the blob, and
//! record the file.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use mediavault_core::config::UploadConfig;
use mediavault_core::error::{AppError, ErrorKind};
use mediavault_core::result::AppResult;
use mediavault_core::traits::storage::BlobStorage;
use mediavault_database::repositories::{FileRepository, FolderRepository};
use mediavault_entity::file::{CreateFile, EntityRef, File};
use mediavault_entity::folder::Folder;

use crate::folder::DefaultFolderProvisioner;

/// One uploaded file's content and client-supplied metadata.
#[derive(Debug, Clone)]
pub struct UploadBlob {
    /// File name as sent by the client.
    pub file_name: String,
    /// MIME type as sent by the client.
    pub mime_type: Option<String>,
    /// File content bytes.
    pub data: Bytes,
}

/// Where an upload should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// A folder chosen by the client.
    Explicit {
        /// Target folder ID.
        folder_id: i64,
    },
    /// A plain upload without a destination.
    Standalone,
    /// An upload attached to a field of a content entry.
    Attach(EntityRef),
}

impl UploadTarget {
    fn uses_default_folder(&self) -> bool {
        !matches!(self, Self::Explicit { .. })
    }

    fn related(&self) -> Option<EntityRef> {
        match self {
            Self::Attach(entity) => Some(entity.clone()),
            _ => None,
        }
    }
}

/// Handles uploads end to end.
#[derive(Debug, Clone)]
pub struct UploadService {
    file_repo: Arc<dyn FileRepository>,
    folder_repo: Arc<dyn FolderRepository>,
    provisioner: Arc<DefaultFolderProvisioner>,
    storage: Arc<dyn BlobStorage>,
    config: UploadConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        file_repo: Arc<dyn FileRepository>,
        folder_repo: Arc<dyn FolderRepository>,
        provisioner: Arc<DefaultFolderProvisioner>,
        storage: Arc<dyn BlobStorage>,
        config: UploadConfig,
    ) -> Self {
        Self {
            file_repo,
            folder_repo,
            provisioner,
            storage,
            config,
        }
    }

    /// Upload a single file.
    pub async fn handle_upload(&self, blob: UploadBlob, target: UploadTarget) -> AppResult<File> {
        self.validate(&blob)?;
        let mut folder = self.resolve_folder(&target).await?;
        self.store_resolved(&mut folder, blob, &target).await
    }

    /// Upload several files to the same target, in order.
    ///
    /// Every blob is validated before anything is stored. A failure part way
    /// through keeps the files already recorded.
    pub async fn handle_uploads(
        &self,
        blobs: Vec<UploadBlob>,
        target: UploadTarget,
    ) -> AppResult<Vec<File>> {
        if blobs.is_empty() {
            return Err(AppError::validation("No files were uploaded"));
        }
        for blob in &blobs {
            self.validate(blob)?;
        }

        let mut folder = self.resolve_folder(&target).await?;
        let mut files = Vec::with_capacity(blobs.len());
        for blob in blobs {
            files.push(self.store_resolved(&mut folder, blob, &target).await?);
        }
        Ok(files)
    }

    fn validate(&self, blob: &UploadBlob) -> AppResult<()> {
        if blob.file_name.trim().is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }
        if blob.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File '{}' exceeds maximum upload size of {} bytes",
                blob.file_name, self.config.max_upload_size_bytes
            )));
        }
        Ok(())
    }

    async fn resolve_folder(&self, target: &UploadTarget) -> AppResult<Folder> {
        match target {
            UploadTarget::Explicit { folder_id } => self
                .folder_repo
                .find_by_id(*folder_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found"))),
            UploadTarget::Standalone | UploadTarget::Attach(_) => {
                self.provisioner.ensure_default_folder().await
            }
        }
    }

    /// Store into `folder`. A default folder deleted in the meantime is
    /// provisioned again once and the upload retried there.
    async fn store_resolved(
        &self,
        folder: &mut Folder,
        blob: UploadBlob,
        target: &UploadTarget,
    ) -> AppResult<File> {
        match self.store_into(folder, blob.clone(), target.related()).await {
            Err(e) if e.kind == ErrorKind::NotFound && target.uses_default_folder() => {
                warn!(
                    folder_id = folder.id,
                    error = %e,
                    "Default upload folder vanished during upload, provisioning again"
                );
                *folder = self.provisioner.ensure_default_folder().await?;
                self.store_into(folder, blob, target.related()).await
            }
            result => result,
        }
    }

    async fn store_into(
        &self,
        folder: &Folder,
        blob: UploadBlob,
        related: Option<EntityRef>,
    ) -> AppResult<File> {
        let size_bytes = blob.data.len() as i64;
        let storage_ref = self
            .storage
            .store(&blob.file_name, blob.data)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to store '{}'", blob.file_name),
                    e,
                )
            })?;

        let record = CreateFile {
            name: blob.file_name,
            storage_ref,
            mime_type: blob.mime_type,
            size_bytes,
            folder_id: folder.id,
            folder_path: folder.path.clone(),
            related,
        };

        let file = match self.file_repo.create(&record).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&record.storage_ref).await {
                    warn!(
                        storage_ref = %record.storage_ref,
                        error = %cleanup,
                        "Failed to remove blob after file record error"
                    );
                }
                return Err(e);
            }
        };

        info!(
            file_id = file.id,
            folder_id = folder.id,
            folder_path = %file.folder_path,
            name = %file.name,
            size = file.size_bytes,
            "Upload completed"
        );
        Ok(file)
    }
}
