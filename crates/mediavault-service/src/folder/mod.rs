//! Folder services.

pub mod naming;
pub mod provision;
pub mod service;

pub use naming::NameDisambiguator;
pub use provision::DefaultFolderProvisioner;
pub use service::FolderService;
