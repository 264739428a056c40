//! Repository traits and their PostgreSQL implementations.

pub mod file;
pub mod folder;

pub use file::{FileRepository, PgFileRepository};
pub use folder::{FolderRepository, PgFolderRepository};
