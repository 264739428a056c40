//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference to the content entry a file was uploaded for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    /// Identifier of the referencing entry.
    pub ref_id: String,
    /// Type of the referencing entry.
    pub ref_type: String,
    /// Field on the entry that holds the file.
    pub field: String,
}

/// An uploaded file's metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: i64,
    /// The file name (including extension).
    pub name: String,
    /// Reference to the blob in the storage backend.
    pub storage_ref: String,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// The folder containing this file, null once that folder is deleted.
    pub folder_id: Option<i64>,
    /// Path of the containing folder at association time.
    pub folder_path: String,
    /// Referencing entry id, for uploads attached to an entry.
    pub related_id: Option<String>,
    /// Referencing entry type.
    pub related_type: Option<String>,
    /// Referencing entry field.
    pub related_field: Option<String>,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// The entry this file was attached to, if any.
    pub fn related(&self) -> Option<EntityRef> {
        match (&self.related_id, &self.related_type, &self.related_field) {
            (Some(ref_id), Some(ref_type), Some(field)) => Some(EntityRef {
                ref_id: ref_id.clone(),
                ref_type: ref_type.clone(),
                field: field.clone(),
            }),
            _ => None,
        }
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// Reference returned by the blob store.
    pub storage_ref: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// The folder to place the file in.
    pub folder_id: i64,
    /// Path of that folder.
    pub folder_path: String,
    /// The entry the file is attached to.
    pub related: Option<EntityRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> File {
        File {
            id: 1,
            name: name.to_string(),
            storage_ref: "ab/abcd.png".to_string(),
            mime_type: None,
            size_bytes: 3,
            folder_id: Some(1),
            folder_path: "/x".to_string(),
            related_id: None,
            related_type: None,
            related_field: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_related_requires_all_parts() {
        let mut f = file("a.txt");
        assert!(f.related().is_none());
        f.related_id = Some("1".to_string());
        f.related_type = Some("api::dog.dog".to_string());
        assert!(f.related().is_none());
        f.related_field = Some("pic".to_string());
        assert_eq!(f.related().unwrap().field, "pic");
    }
}
