//! Default upload folder provisioning.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use mediavault_core::config::{DefaultFolderLookup, UploadConfig};
use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;
use mediavault_database::repositories::FolderRepository;
use mediavault_entity::folder::{CreateFolder, Folder, FolderRole, ParentScope};

use super::naming::NameDisambiguator;

/// Ensures the root folder that receives uploads without a destination
/// exists, creating it on demand.
///
/// The current default folder is looked up in the repository on every call.
/// Folders can be deleted at any time by other requests, so nothing about
/// the default folder is remembered between calls.
#[derive(Debug)]
pub struct DefaultFolderProvisioner {
    folder_repo: Arc<dyn FolderRepository>,
    naming: NameDisambiguator,
    config: UploadConfig,
    /// One lock per `(scope, desired name)` so in-process calls line up.
    locks: DashMap<(ParentScope, String), Arc<Mutex<()>>>,
}

impl DefaultFolderProvisioner {
    /// Creates a new provisioner.
    pub fn new(folder_repo: Arc<dyn FolderRepository>, config: UploadConfig) -> Self {
        Self {
            naming: NameDisambiguator::new(Arc::clone(&folder_repo)),
            folder_repo,
            config,
            locks: DashMap::new(),
        }
    }

    /// Return the default upload folder, creating it if it is gone.
    ///
    /// A newly created folder takes the configured name if it is free in
    /// the root scope, otherwise the first free numbered variant. Losing a
    /// creation race to another writer restarts the lookup, so the winner's
    /// folder is returned instead.
    pub async fn ensure_default_folder(&self) -> AppResult<Folder> {
        let desired = self.config.default_folder_name.as_str();
        let lock = self.scope_lock(ParentScope::Root, desired);
        let _guard = lock.lock().await;

        let mut conflicts = 0u32;
        loop {
            if let Some(folder) = self.lookup(desired).await? {
                debug!(folder_id = folder.id, uid = %folder.uid, "Reusing default upload folder");
                return Ok(folder);
            }

            let name = self.naming.unique_name(desired, None).await?;
            let data = match self.config.default_folder_lookup {
                DefaultFolderLookup::Designated => {
                    CreateFolder::new(name, None).with_role(FolderRole::DefaultUpload)
                }
                DefaultFolderLookup::ByName => CreateFolder::new(name, None),
            };

            match self.folder_repo.create(&data).await {
                Ok(folder) => {
                    info!(
                        folder_id = folder.id,
                        uid = %folder.uid,
                        name = %folder.name,
                        "Provisioned default upload folder"
                    );
                    return Ok(folder);
                }
                Err(e) if e.is_conflict() && conflicts < self.config.provision_retries => {
                    conflicts += 1;
                    warn!(
                        attempt = conflicts,
                        name = %data.name,
                        error = %e,
                        "Default upload folder creation conflicted, retrying"
                    );
                }
                Err(e) if e.is_conflict() => {
                    return Err(AppError::internal(format!(
                        "Default upload folder did not settle after {conflicts} retries: {}",
                        e.message
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn lookup(&self, desired: &str) -> AppResult<Option<Folder>> {
        match self.config.default_folder_lookup {
            DefaultFolderLookup::Designated => {
                self.folder_repo.find_by_role(FolderRole::DefaultUpload).await
            }
            DefaultFolderLookup::ByName => {
                self.folder_repo.find_by_name_and_parent(desired, None).await
            }
        }
    }

    fn scope_lock(&self, scope: ParentScope, name: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry((scope, name.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
