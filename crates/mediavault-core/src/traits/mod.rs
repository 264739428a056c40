//! Core traits defined in `mediavault-core` and implemented by other crates.

pub mod storage;

pub use storage::BlobStorage;
