//! File lookups.

use std::sync::Arc;

use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;
use mediavault_database::repositories::{FileRepository, FolderRepository};
use mediavault_entity::file::File;
use mediavault_entity::folder::Folder;

/// A file record together with its current folder.
#[derive(Debug, Clone)]
pub struct FileDetails {
    /// The file record.
    pub file: File,
    /// The folder the file is in, if it still has one.
    pub folder: Option<Folder>,
}

/// Read access to uploaded files.
#[derive(Debug, Clone)]
pub struct FileService {
    file_repo: Arc<dyn FileRepository>,
    folder_repo: Arc<dyn FolderRepository>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<dyn FileRepository>, folder_repo: Arc<dyn FolderRepository>) -> Self {
        Self {
            file_repo,
            folder_repo,
        }
    }

    /// Gets a file and its folder.
    pub async fn get_file(&self, file_id: i64) -> AppResult<FileDetails> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        let folder = match file.folder_id {
            Some(folder_id) => self.folder_repo.find_by_id(folder_id).await?,
            None => None,
        };

        Ok(FileDetails { file, folder })
    }
}

#[cfg(test)]
mod tests {
    use mediavault_core::error::ErrorKind;
    use mediavault_database::MemoryStore;
    use mediavault_entity::file::CreateFile;
    use mediavault_entity::folder::CreateFolder;

    use super::*;

    #[tokio::test]
    async fn test_get_file_with_folder() {
        let store = MemoryStore::new();
        let service = FileService::new(Arc::new(store.files()), Arc::new(store.folders()));

        let folder = store.folders().create(&CreateFolder::new("A", None)).await.unwrap();
        let file = store
            .files()
            .create(&CreateFile {
                name: "a.txt".to_string(),
                storage_ref: "ab/ab.txt".to_string(),
                mime_type: None,
                size_bytes: 1,
                folder_id: folder.id,
                folder_path: folder.path.clone(),
                related: None,
            })
            .await
            .unwrap();

        let details = service.get_file(file.id).await.unwrap();
        assert_eq!(details.folder.unwrap().uid, folder.uid);

        store.folders().bulk_delete(&[folder.id]).await.unwrap();
        let details = service.get_file(file.id).await.unwrap();
        assert!(details.folder.is_none());
        assert_eq!(details.file.folder_path, folder.path);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = MemoryStore::new();
        let service = FileService::new(Arc::new(store.files()), Arc::new(store.folders()));
        let err = service.get_file(5).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
