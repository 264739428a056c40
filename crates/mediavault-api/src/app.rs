//! Server bootstrap: backends, state, router, and the listening socket.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use mediavault_core::config::AppConfig;
use mediavault_core::error::{AppError, ErrorKind};
use mediavault_core::result::AppResult;
use mediavault_database::Repositories;
use mediavault_storage::build_blob_storage;

use crate::router::build_router;
use crate::state::AppState;

/// Runs the MediaVault server until Ctrl+C or SIGTERM.
///
/// After the signal, in-flight requests get `server.shutdown_grace_seconds`
/// to finish before the server is stopped.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!(
        database = %config.database.provider,
        storage = %config.storage.provider,
        default_folder = %config.upload.default_folder_name,
        lookup = ?config.upload.default_folder_lookup,
        "Starting MediaVault server"
    );

    let repositories = Repositories::new(&config.database).await?;
    let storage = build_blob_storage(&config.storage).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_router(AppState::new(config, repositories.clone(), storage));

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    info!(addr = %addr, "MediaVault server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
    });
    let mut server = tokio::spawn(async move { server.await });

    let joined = tokio::select! {
        joined = &mut server => joined,
        _ = shutdown_signal() => {
            info!(grace_seconds = grace.as_secs(), "Shutdown signal received, draining requests");
            let _ = shutdown_tx.send(true);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!("Grace period elapsed, stopping with requests still in flight");
                    server.abort();
                    Ok(Ok(()))
                }
            }
        }
    };

    repositories.close().await;

    match joined {
        Ok(Ok(())) => {
            info!("MediaVault server shut down gracefully");
            Ok(())
        }
        Ok(Err(e)) => Err(AppError::with_source(ErrorKind::Internal, "Server error", e)),
        Err(e) => Err(AppError::with_source(ErrorKind::Internal, "Server task failed", e)),
    }
}

/// Wait for Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
