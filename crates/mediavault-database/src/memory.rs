//! In-memory folder and file repositories for tests and single-node setups.
//!
//! Both repositories share one [`MemoryStore`] so that folder deletes and
//! moves reach the file records the same way the foreign keys and path
//! rewrites do in PostgreSQL.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;
use mediavault_entity::file::{CreateFile, File};
use mediavault_entity::folder::{
    CreateFolder, Folder, FolderRole, ParentScope, UpdateFolder, compute_path, is_within,
    rebase_path,
};

use crate::repositories::{FileRepository, FolderRepository};

#[derive(Debug, Default)]
struct InnerState {
    folders: BTreeMap<i64, Folder>,
    files: BTreeMap<i64, File>,
    last_folder_id: i64,
    last_file_id: i64,
}

impl InnerState {
    fn name_taken(&self, name: &str, parent_id: Option<i64>, except: Option<i64>) -> bool {
        self.folders.values().any(|f| {
            f.parent_id == parent_id && f.name == name && Some(f.id) != except
        })
    }
}

/// Shared state behind the memory repositories.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A folder repository over this store.
    pub fn folders(&self) -> MemoryFolderRepository {
        MemoryFolderRepository {
            store: self.clone(),
        }
    }

    /// A file repository over this store.
    pub fn files(&self) -> MemoryFileRepository {
        MemoryFileRepository {
            store: self.clone(),
        }
    }
}

/// Folder repository kept in process memory.
#[derive(Debug, Clone)]
pub struct MemoryFolderRepository {
    store: MemoryStore,
}

#[async_trait]
impl FolderRepository for MemoryFolderRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Folder>> {
        let state = self.store.state.read().await;
        Ok(state.folders.get(&id).cloned())
    }

    async fn find_by_uid(&self, uid: Uuid) -> AppResult<Option<Folder>> {
        let state = self.store.state.read().await;
        Ok(state.folders.values().find(|f| f.uid == uid).cloned())
    }

    async fn find_by_name_and_parent(
        &self,
        name: &str,
        parent_id: Option<i64>,
    ) -> AppResult<Option<Folder>> {
        let state = self.store.state.read().await;
        Ok(state
            .folders
            .values()
            .find(|f| f.parent_id == parent_id && f.name == name)
            .cloned())
    }

    async fn find_by_role(&self, role: FolderRole) -> AppResult<Option<Folder>> {
        let state = self.store.state.read().await;
        Ok(state
            .folders
            .values()
            .find(|f| f.role == Some(role))
            .cloned())
    }

    async fn sibling_names(
        &self,
        parent_id: Option<i64>,
        prefix: &str,
    ) -> AppResult<HashSet<String>> {
        let state = self.store.state.read().await;
        Ok(state
            .folders
            .values()
            .filter(|f| f.parent_id == parent_id && f.name.starts_with(prefix))
            .map(|f| f.name.clone())
            .collect())
    }

    async fn list(&self, scope: Option<ParentScope>) -> AppResult<Vec<Folder>> {
        let state = self.store.state.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| scope.is_none_or(|s| f.scope() == s))
            .cloned()
            .collect();
        if scope.is_some() {
            folders.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(folders)
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.store.state.write().await;

        let parent = match data.parent_id {
            Some(parent_id) => Some(
                state
                    .folders
                    .get(&parent_id)
                    .ok_or_else(|| AppError::not_found(format!("Folder {parent_id} not found")))?,
            ),
            None => None,
        };
        let uid = Uuid::new_v4();
        let path = compute_path(parent, uid);

        if state.name_taken(&data.name, data.parent_id, None) {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                data.name
            )));
        }
        if let Some(role) = data.role {
            if state.folders.values().any(|f| f.role == Some(role)) {
                return Err(AppError::conflict(
                    "Folder role is already held by another folder",
                ));
            }
        }

        state.last_folder_id += 1;
        let now = Utc::now();
        let folder = Folder {
            id: state.last_folder_id,
            uid,
            name: data.name.clone(),
            parent_id: data.parent_id,
            path,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());

        info!(
            folder_id = folder.id,
            uid = %folder.uid,
            name = %folder.name,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    async fn update(&self, id: i64, data: &UpdateFolder) -> AppResult<Folder> {
        let mut state = self.store.state.write().await;

        let current = state
            .folders
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        let (parent_id, path) = match data.parent_id {
            Some(Some(parent_id)) => {
                let parent = state
                    .folders
                    .get(&parent_id)
                    .ok_or_else(|| AppError::not_found(format!("Folder {parent_id} not found")))?;
                if is_within(&parent.path, &current.path) {
                    return Err(AppError::validation(
                        "A folder cannot be moved into itself or one of its descendants",
                    ));
                }
                (Some(parent_id), compute_path(Some(parent), current.uid))
            }
            Some(None) => (None, compute_path(None, current.uid)),
            None => (current.parent_id, current.path.clone()),
        };
        let name = data.name.clone().unwrap_or_else(|| current.name.clone());

        if state.name_taken(&name, parent_id, Some(id)) {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }

        let now = Utc::now();
        if path != current.path {
            for folder in state.folders.values_mut() {
                if folder.id != id && is_within(&folder.path, &current.path) {
                    folder.path = rebase_path(&folder.path, &current.path, &path);
                    folder.updated_at = now;
                }
            }
            for file in state.files.values_mut() {
                if is_within(&file.folder_path, &current.path) {
                    file.folder_path = rebase_path(&file.folder_path, &current.path, &path);
                    file.updated_at = now;
                }
            }
        }

        let updated = Folder {
            name,
            parent_id,
            path,
            updated_at: now,
            ..current
        };
        state.folders.insert(id, updated.clone());

        info!(
            folder_id = updated.id,
            name = %updated.name,
            path = %updated.path,
            "Folder updated"
        );
        Ok(updated)
    }

    async fn bulk_delete(&self, ids: &[i64]) -> AppResult<u64> {
        let mut state = self.store.state.write().await;

        let roots: Vec<String> = ids
            .iter()
            .filter_map(|id| state.folders.get(id).map(|f| f.path.clone()))
            .collect();
        let doomed: HashSet<i64> = state
            .folders
            .values()
            .filter(|f| roots.iter().any(|root| is_within(&f.path, root)))
            .map(|f| f.id)
            .collect();

        state.folders.retain(|id, _| !doomed.contains(id));
        for file in state.files.values_mut() {
            if file.folder_id.is_some_and(|id| doomed.contains(&id)) {
                file.folder_id = None;
            }
        }

        let count = doomed.len() as u64;
        info!(requested = ids.len(), deleted = count, "Folders deleted");
        Ok(count)
    }
}

/// File repository kept in process memory.
#[derive(Debug, Clone)]
pub struct MemoryFileRepository {
    store: MemoryStore,
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<File>> {
        let state = self.store.state.read().await;
        Ok(state.files.get(&id).cloned())
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let mut state = self.store.state.write().await;

        if !state.folders.contains_key(&data.folder_id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                data.folder_id
            )));
        }

        state.last_file_id += 1;
        let now = Utc::now();
        let related = data.related.clone();
        let file = File {
            id: state.last_file_id,
            name: data.name.clone(),
            storage_ref: data.storage_ref.clone(),
            mime_type: data.mime_type.clone(),
            size_bytes: data.size_bytes,
            folder_id: Some(data.folder_id),
            folder_path: data.folder_path.clone(),
            related_id: related.as_ref().map(|r| r.ref_id.clone()),
            related_type: related.as_ref().map(|r| r.ref_type.clone()),
            related_field: related.map(|r| r.field),
            created_at: now,
            updated_at: now,
        };
        state.files.insert(file.id, file.clone());

        info!(
            file_id = file.id,
            folder_id = data.folder_id,
            name = %file.name,
            "File record created"
        );
        Ok(file)
    }
}
