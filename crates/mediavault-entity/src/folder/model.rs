//! Folder entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Conceptual role a folder can hold. At most one folder holds each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "folder_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FolderRole {
    /// The folder that receives uploads without an explicit destination.
    DefaultUpload,
}

impl FolderRole {
    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultUpload => "default_upload",
        }
    }
}

impl fmt::Display for FolderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A folder in the upload hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Internal numeric identifier.
    pub id: i64,
    /// Stable opaque identifier, never reused.
    pub uid: Uuid,
    /// Folder name, unique among siblings.
    pub name: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<i64>,
    /// Materialized path of ancestor uids (e.g., `/<uid>/<uid>`).
    pub path: String,
    /// Role held by this folder, if any.
    pub role: Option<FolderRole>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The sibling scope this folder belongs to.
    pub fn scope(&self) -> ParentScope {
        ParentScope::from(self.parent_id)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<i64>,
    /// Role to claim on creation.
    pub role: Option<FolderRole>,
}

impl CreateFolder {
    /// A plain folder without a role.
    pub fn new(name: impl Into<String>, parent_id: Option<i64>) -> Self {
        Self {
            name: name.into(),
            parent_id,
            role: None,
        }
    }

    /// Claim the given role on creation.
    pub fn with_role(mut self, role: FolderRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Rename and/or move a folder.
///
/// `parent_id` is doubly optional: `None` leaves the parent untouched,
/// `Some(None)` moves the folder to the root.
#[derive(Debug, Clone, Default)]
pub struct UpdateFolder {
    /// New name.
    pub name: Option<String>,
    /// New parent.
    pub parent_id: Option<Option<i64>>,
}

/// A sibling scope: the root group or the children of one folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentScope {
    /// Folders without a parent.
    Root,
    /// Direct children of the given folder.
    Folder(i64),
}

impl ParentScope {
    /// The parent id this scope stands for.
    pub fn parent_id(&self) -> Option<i64> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(*id),
        }
    }
}

impl From<Option<i64>> for ParentScope {
    fn from(parent_id: Option<i64>) -> Self {
        parent_id.map_or(Self::Root, Self::Folder)
    }
}

impl fmt::Display for ParentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Folder(id) => write!(f, "{id}"),
        }
    }
}
