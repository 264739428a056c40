//! Folder domain entities.

pub mod model;
pub mod path;

pub use model::{CreateFolder, Folder, FolderRole, ParentScope, UpdateFolder};
pub use path::{compute_path, is_within, rebase_path};
