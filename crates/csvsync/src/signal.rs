//! Shutdown signal wiring.

use std::io;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::{
    select,
    signal::unix::{SignalKind, signal},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Wait for SIGINT or SIGTERM and return the signal's name.
#[cfg(unix)]
async fn shutdown_signal() -> io::Result<&'static str> {
    let mut term = signal(SignalKind::terminate())?;
    select! {
        r = ctrl_c() => r.map(|()| "SIGINT"),
        _ = term.recv() => Ok("SIGTERM"),
    }
}

/// Wait for Ctrl-C.
#[cfg(not(unix))]
async fn shutdown_signal() -> io::Result<&'static str> {
    ctrl_c().await.map(|()| "interrupt")
}

/// Cancel `cancel` when a shutdown signal arrives.
pub fn cancel_on_shutdown(cancel: CancellationToken) {
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(name) => {
                info!("Received {name}; finishing current cycle");
                cancel.cancel();
            }
            Err(e) => warn!("Cannot listen for shutdown signals: {e}"),
        }
    });
}
