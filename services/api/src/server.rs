//! HTTP listener lifecycle and graceful shutdown

use std::{future::Future, time::Duration};

use anyhow::{Result, anyhow, bail};
use axum::Router;
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{error, info};

/// Serve `app` on `listener` until `signal` resolves
///
/// The listener runs in a background task. Once `signal` fires, new
/// connections are refused and in-flight requests get `shutdown_timeout`
/// to finish; running over that budget is reported as an error.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown_timeout: Duration,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            return match joined {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(anyhow!("Server error: {}", e)),
                Err(e) => Err(anyhow!("Server task failed: {}", e)),
            };
        }
        _ = signal => {
            info!("Shutting down the server");
        }
    }

    let _ = stop_tx.send(());

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(Ok(Ok(()))) => {
            info!("Server stopped");
            Ok(())
        }
        Ok(Ok(Err(e))) => Err(anyhow!("Server error during shutdown: {}", e)),
        Ok(Err(e)) => Err(anyhow!("Server task failed: {}", e)),
        Err(_) => {
            error!(
                "In-flight requests did not finish within {:?}",
                shutdown_timeout
            );
            bail!("Graceful shutdown timed out after {:?}", shutdown_timeout)
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
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
