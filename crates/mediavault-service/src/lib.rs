//! # mediavault-service
//!
//! Business logic for MediaVault: the default upload folder provisioner,
//! folder name disambiguation, folder management, and upload orchestration.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod file;
pub mod folder;

pub use file::{FileDetails, FileService, UploadBlob, UploadService, UploadTarget};
pub use folder::{DefaultFolderProvisioner, FolderService, NameDisambiguator};
