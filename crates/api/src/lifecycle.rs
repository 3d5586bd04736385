//! Startup and shutdown.
//!
//! ```text
//! bind ──▶ serve ──(signal)──▶ stop accepting ──▶ drain in-flight ──▶ Drained
//!                                                      │
//!                                               grace elapsed
//!                                                      ▼
//!                                                  TimedOut
//! ```
//!
//! A bind failure is fatal and never retried.

use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;

/// Errors that end the server before or while it runs.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Another socket already owns the address.
    #[error("address {addr} is already in use")]
    AddrInUse {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Any other bind failure (permissions, bad address, ...).
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The accept loop failed.
    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

/// How the server stopped after a shutdown signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished within the grace period.
    Drained,
    /// The grace period elapsed with requests still running.
    TimedOut,
}

/// Binds the listening socket. Failures are logged and returned as-is.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(source) if source.kind() == io::ErrorKind::AddrInUse => {
            tracing::error!(%addr, error = %source, "port is already in use");
            Err(ServerError::AddrInUse {
                addr: addr.to_string(),
                source,
            })
        }
        Err(source) => {
            tracing::error!(%addr, error = %source, "server failed to start");
            Err(ServerError::Bind {
                addr: addr.to_string(),
                source,
            })
        }
    }
}

/// Serves `app` until `signal` resolves, then drains for at most `grace`.
///
/// New connections are refused as soon as the signal fires.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<ShutdownOutcome, ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (triggered_tx, mut triggered_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = triggered_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        biased;
        result = &mut server => {
            result?;
            return Ok(ShutdownOutcome::Drained);
        }
        changed = triggered_rx.changed() => {
            // The sender is only dropped once the server future is gone.
            if changed.is_err() {
                return Ok(ShutdownOutcome::Drained);
            }
        }
    }

    tracing::info!(
        grace_secs = grace.as_secs_f64(),
        "shutdown signal received, draining in-flight requests"
    );

    match tokio::time::timeout(grace, server).await {
        Ok(result) => {
            result?;
            Ok(ShutdownOutcome::Drained)
        }
        Err(_) => {
            tracing::error!("forcing shutdown after timeout");
            Ok(ShutdownOutcome::TimedOut)
        }
    }
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
