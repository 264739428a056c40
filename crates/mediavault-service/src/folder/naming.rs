//! Folder name disambiguation.

use std::collections::HashSet;
use std::iter;
use std::sync::Arc;

use mediavault_core::error::AppError;
use mediavault_core::result::AppResult;
use mediavault_database::repositories::FolderRepository;

/// Candidate names for `desired`: the name itself, then `"{desired} (1)"`,
/// `"{desired} (2)"`, and so on without end.
pub fn candidate_names(desired: &str) -> impl Iterator<Item = String> + '_ {
    iter::once(desired.to_string()).chain((1u64..).map(move |n| format!("{desired} ({n})")))
}

/// The first candidate for `desired` that is not in `taken`.
pub fn first_free(desired: &str, taken: &HashSet<String>) -> Option<String> {
    candidate_names(desired).find(|candidate| !taken.contains(candidate))
}

/// Picks a folder name that no sibling holds yet.
#[derive(Debug, Clone)]
pub struct NameDisambiguator {
    folder_repo: Arc<dyn FolderRepository>,
}

impl NameDisambiguator {
    /// Creates a new disambiguator.
    pub fn new(folder_repo: Arc<dyn FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Return `desired` if it is free in the scope, else the first free
    /// numbered variant.
    ///
    /// The answer is only a snapshot: a concurrent writer can take the name
    /// before it is used, which the caller sees as a conflict on create.
    pub async fn unique_name(&self, desired: &str, parent_id: Option<i64>) -> AppResult<String> {
        let taken = self.folder_repo.sibling_names(parent_id, desired).await?;
        first_free(desired, &taken)
            .ok_or_else(|| AppError::internal(format!("No free name derived from '{desired}'")))
    }
}

#[cfg(test)]
mod tests {
    use mediavault_database::MemoryStore;
    use mediavault_entity::folder::CreateFolder;

    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_candidates_start_with_desired() {
        let first: Vec<String> = candidate_names("Uploads").take(3).collect();
        assert_eq!(first, vec!["Uploads", "Uploads (1)", "Uploads (2)"]);
    }

    #[test]
    fn test_first_free() {
        assert_eq!(first_free("Uploads", &taken(&[])).unwrap(), "Uploads");
        assert_eq!(
            first_free("Uploads", &taken(&["Uploads"])).unwrap(),
            "Uploads (1)"
        );
        // Gaps are filled before the sequence continues.
        assert_eq!(
            first_free("Uploads", &taken(&["Uploads", "Uploads (2)"])).unwrap(),
            "Uploads (1)"
        );
        assert_eq!(
            first_free("Uploads", &taken(&["Uploads (1)"])).unwrap(),
            "Uploads"
        );
    }

    #[tokio::test]
    async fn test_unique_name_after_five_variants() {
        let folders = Arc::new(MemoryStore::new().folders());
        folders.create(&CreateFolder::new("Uploads", None)).await.unwrap();
        for n in 1..=5 {
            folders
                .create(&CreateFolder::new(format!("Uploads ({n})"), None))
                .await
                .unwrap();
        }

        let naming = NameDisambiguator::new(folders);
        assert_eq!(naming.unique_name("Uploads", None).await.unwrap(), "Uploads (6)");
    }

    #[tokio::test]
    async fn test_unique_name_is_scoped() {
        let folders = Arc::new(MemoryStore::new().folders());
        let parent = folders.create(&CreateFolder::new("Uploads", None)).await.unwrap();

        let naming = NameDisambiguator::new(folders);
        assert_eq!(
            naming.unique_name("Uploads", Some(parent.id)).await.unwrap(),
            "Uploads"
        );
        assert_eq!(naming.unique_name("Uploads", None).await.unwrap(), "Uploads (1)");
    }
}
