//! Folder management: explicit create, rename/move, listing, and bulk delete.

use std::sync::Arc;

use tracing::info;

use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;
use mediavault_database::repositories::FolderRepository;
use mediavault_entity::folder::{CreateFolder, Folder, ParentScope, UpdateFolder};

/// Longest accepted folder name, in characters.
const MAX_NAME_LEN: usize = 255;

/// Manages folders on behalf of users.
///
/// Explicit creation does not disambiguate names: asking for a name that a
/// sibling already holds is a conflict for the caller to resolve.
#[derive(Debug, Clone)]
pub struct FolderService {
    folder_repo: Arc<dyn FolderRepository>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<dyn FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: i64) -> AppResult<Folder> {
        self.folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Lists every folder, or the folders of one sibling scope.
    pub async fn list_folders(&self, scope: Option<ParentScope>) -> AppResult<Vec<Folder>> {
        self.folder_repo.list(scope).await
    }

    /// Creates a folder with exactly the given name.
    pub async fn create_folder(&self, name: &str, parent_id: Option<i64>) -> AppResult<Folder> {
        let name = validate_name(name)?;
        let folder = self
            .folder_repo
            .create(&CreateFolder::new(name, parent_id))
            .await?;

        info!(
            folder_id = folder.id,
            parent_id = ?folder.parent_id,
            name = %folder.name,
            "Folder created by request"
        );
        Ok(folder)
    }

    /// Renames and/or moves a folder.
    pub async fn update_folder(&self, folder_id: i64, update: UpdateFolder) -> AppResult<Folder> {
        let update = UpdateFolder {
            name: update.name.as_deref().map(validate_name).transpose()?,
            parent_id: update.parent_id,
        };
        self.folder_repo.update(folder_id, &update).await
    }

    /// Deletes folders together with their subfolders.
    ///
    /// Files inside lose their folder association but are kept.
    pub async fn bulk_delete(&self, folder_ids: &[i64]) -> AppResult<u64> {
        let deleted = self.folder_repo.bulk_delete(folder_ids).await?;
        info!(
            folder_ids = ?folder_ids,
            deleted = deleted,
            "Bulk folder delete completed"
        );
        Ok(deleted)
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Folder name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if name.contains('/') {
        return Err(AppError::validation("Folder name must not contain '/'"));
    }
    Ok(name.to_string())
}
