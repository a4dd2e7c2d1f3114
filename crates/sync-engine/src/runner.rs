//! The polling loop.
//!
//! One cooperative loop owns everything: it polls the data file, extracts the
//! desired state when the file moved forward, and hands it to the
//! [`Reconciler`]. While disconnected it re-exercises the connect path every
//! `reconnect_interval`. Cancellation is observed once per iteration; a cycle
//! in progress runs to completion.

use config::Config;
use obs_client::ops::SourceOps;
use tokio::{
    select,
    time::{Instant, sleep},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{Error, FileWatch, Reconciler, Result, SyncOutcome, extract};

/// Drives the poll/extract/reconcile cycle until cancelled.
pub struct Runner<O> {
    /// Loaded configuration.
    config: Config,
    /// Owns the remote connection.
    reconciler: Reconciler<O>,
    /// Data file modification poller.
    watch: FileWatch,
    /// Shutdown signal.
    cancel: CancellationToken,
}

impl<O: SourceOps> Runner<O> {
    /// Build a runner over `ops`. The data file's current modification time is
    /// taken as seen; [`Self::run`] performs an initial sync regardless.
    pub fn new(config: Config, ops: O, cancel: CancellationToken) -> Self {
        let reconciler = Reconciler::new(ops, &config);
        let watch = FileWatch::new(config.data_file.clone());
        Self {
            config,
            reconciler,
            watch,
            cancel,
        }
    }

    /// The reconciler, for inspection.
    pub fn reconciler(&self) -> &Reconciler<O> {
        &self.reconciler
    }

    /// Connect, sync once, then poll until cancelled. Disconnects on exit.
    ///
    /// Fails only when the startup connect fails and the configuration
    /// requires a connection.
    pub async fn run(&mut self) -> Result<()> {
        info!(data_file = %self.config.data_file.display(), "Starting csvsync");

        if !self.reconciler.connect().await {
            if self.config.require_connection {
                return Err(Error::ConnectFailed {
                    attempts: self.config.retry.max_attempts,
                });
            }
            warn!("Not connected; continuing in degraded mode");
        }

        self.cycle().await;

        let poll = self.config.poll_interval();
        let reconnect_every = self.config.reconnect_interval();
        let mut last_reconnect = Instant::now();

        while !self.cancel.is_cancelled() {
            select! {
                _ = self.cancel.cancelled() => break,
                _ = sleep(poll) => {}
            }

            if !self.reconciler.is_connected() && last_reconnect.elapsed() >= reconnect_every {
                last_reconnect = Instant::now();
                if self.reconciler.reconnect().await {
                    info!("Reconnected; resyncing all sources");
                    self.cycle().await;
                    continue;
                }
            }

            if self.watch.poll() {
                debug!("Data file changed; checking for updates");
                self.cycle().await;
            }
        }

        info!("Shutting down");
        self.reconciler.disconnect().await;
        info!("csvsync stopped");
        Ok(())
    }

    /// Extract and sync once. An unreadable data file skips the cycle.
    pub async fn cycle(&mut self) -> Option<SyncOutcome> {
        match extract::extract_file(&self.config.data_file, &self.config.mapping) {
            Ok(desired) => Some(self.reconciler.sync(desired).await),
            Err(e) => {
                warn!("{e}; skipping cycle");
                None
            }
        }
    }
}

/// Connect, push the current desired state unconditionally, and disconnect.
///
/// Returns whether every source updated.
pub async fn sync_once<O: SourceOps>(config: &Config, ops: O) -> Result<bool> {
    let desired = extract::extract_file(&config.data_file, &config.mapping)?;
    let mut reconciler = Reconciler::new(ops, config);
    if !reconciler.connect().await {
        return Err(Error::ConnectFailed {
            attempts: config.retry.max_attempts,
        });
    }
    let ok = if desired.is_empty() {
        info!("Nothing mapped; nothing to push");
        true
    } else {
        reconciler.apply(&desired).await
    };
    if !ok {
        error!("Failed to update some sources");
    }
    reconciler.disconnect().await;
    Ok(ok)
}
