//! Graceful shutdown signal handling

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

/// Failure to install a shutdown signal handler.
#[derive(Debug, Error)]
#[error("failed to install {signal} handler: {source}")]
pub(crate) struct ShutdownSignalError {
    signal: &'static str,
    #[source]
    source: io::Error,
}

/// Wait for an interrupt or terminate signal, then stop the server
/// gracefully.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    let interrupt = async {
        signal::ctrl_c().await.map_err(|source| ShutdownSignalError {
            signal: "Ctrl+C",
            source,
        })
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(|source| ShutdownSignalError {
                signal: "SIGTERM",
                source,
            })?
            .recv()
            .await;

        Ok(())
    };

    // Windows has no SIGTERM; Ctrl+C is the only shutdown path there.
    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<(), ShutdownSignalError>>();

    tokio::select! {
        result = interrupt => {
            result?;
            info!("interrupt received, shutting down");
        }
        result = terminate => {
            result?;
            info!("terminate received, shutting down");
        }
    }

    handle.stop_graceful(None);

    Ok(())
}
