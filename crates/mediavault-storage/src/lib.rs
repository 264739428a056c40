//! # mediavault-storage
//!
//! Blob storage providers for MediaVault: the local filesystem and an
//! in-process map. Providers only deal in opaque storage references; folder
//! placement lives entirely in the metadata layer.

pub mod manager;
pub mod providers;

pub use manager::build_blob_storage;
