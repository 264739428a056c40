//! # mediavault-entity
//!
//! Domain entity models for MediaVault. Every struct in this crate
//! represents a database table row or a domain value object. Row entities
//! derive `sqlx::FromRow` in addition to the serde traits.

pub mod file;
pub mod folder;
