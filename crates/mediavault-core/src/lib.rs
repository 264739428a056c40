//! # mediavault-core
//!
//! Core crate for MediaVault. Contains the blob storage trait, configuration
//! schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other MediaVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
