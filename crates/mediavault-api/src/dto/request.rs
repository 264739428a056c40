//! Request DTOs with validation.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use mediavault_core::error::AppError;
use mediavault_entity::folder::{ParentScope, UpdateFolder};

/// Run the `validator` rules of a request body.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

/// Keep an explicit `null` apart from a missing field.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,
    /// Parent folder ID (null or absent for a root folder).
    #[serde(default)]
    pub parent: Option<i64>,
}

/// Rename/move folder request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New parent: absent keeps the parent, `null` moves to the root.
    #[serde(default, deserialize_with = "double_option")]
    pub parent: Option<Option<i64>>,
}

impl From<UpdateFolderRequest> for UpdateFolder {
    fn from(req: UpdateFolderRequest) -> Self {
        Self {
            name: req.name,
            parent_id: req.parent,
        }
    }
}

/// Bulk delete request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    /// Folders to delete with their subfolders.
    #[serde(default)]
    pub folder_ids: Vec<i64>,
}

/// Query string of the folder listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderListQuery {
    /// `root`, a folder ID, or absent for every folder.
    pub parent: Option<String>,
}

impl FolderListQuery {
    /// The sibling scope to list, if any.
    pub fn scope(&self) -> Result<Option<ParentScope>, AppError> {
        match self.parent.as_deref() {
            None => Ok(None),
            Some("root") | Some("null") => Ok(Some(ParentScope::Root)),
            Some(raw) => raw
                .parse::<i64>()
                .map(|id| Some(ParentScope::Folder(id)))
                .map_err(|_| AppError::validation(format!("Invalid parent: '{raw}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_parent_null_vs_missing() {
        let missing: UpdateFolderRequest = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(missing.parent, None);

        let null: UpdateFolderRequest = serde_json::from_str(r#"{"parent":null}"#).unwrap();
        assert_eq!(null.parent, Some(None));

        let moved: UpdateFolderRequest = serde_json::from_str(r#"{"parent":4}"#).unwrap();
        assert_eq!(moved.parent, Some(Some(4)));
    }

    #[test]
    fn test_create_validation() {
        let req = CreateFolderRequest {
            name: String::new(),
            parent: None,
        };
        assert!(validate_body(&req).is_err());
    }

    #[test]
    fn test_list_scope() {
        let query = |p: Option<&str>| FolderListQuery {
            parent: p.map(String::from),
        };
        assert_eq!(query(None).scope().unwrap(), None);
        assert_eq!(query(Some("root")).scope().unwrap(), Some(ParentScope::Root));
        assert_eq!(
            query(Some("3")).scope().unwrap(),
            Some(ParentScope::Folder(3))
        );
        assert!(query(Some("abc")).scope().is_err());
    }
}
