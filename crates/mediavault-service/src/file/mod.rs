//! File services.

pub mod service;
pub mod upload;

pub use service::{FileDetails, FileService};
pub use upload::{UploadBlob, UploadService, UploadTarget};
