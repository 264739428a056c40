//! # mediavault-database
//!
//! Folder and file persistence for MediaVault: the repository traits, their
//! PostgreSQL implementations with connection and migration handling, and
//! in-memory implementations with the same invariants.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use provider::Repositories;
pub use repositories::{FileRepository, FolderRepository};
