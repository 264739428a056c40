//! # mediavault-api
//!
//! HTTP API layer for MediaVault built on Axum.
//!
//! Provides the upload and folder endpoints under `/upload`, the health
//! endpoint, CORS and request logging middleware, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use router::build_router;
pub use state::AppState;
