// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Revocation Pruner
//!
//! Background task that sweeps the revocation store on a fixed interval,
//! dropping entries older than the store's retention window.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`; the loop exits as soon as the
//! token is cancelled, whether it is sleeping or about to sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::auth::RevocationStore;

/// Default interval between sweeps.
const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(3_600);

pub struct RevocationPruner {
    store: Arc<RevocationStore>,
    interval: Duration,
}

impl RevocationPruner {
    pub fn new(store: Arc<RevocationStore>) -> Self {
        Self {
            store,
            interval: DEFAULT_PRUNE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// ```rust,ignore
    /// tokio::spawn(pruner.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            retention_hours = self.store.retention().num_hours(),
            "Revocation pruner starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Revocation pruner shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }

    fn sweep(&self) -> usize {
        let removed = self.store.prune();
        if removed > 0 {
            info!(
                removed,
                remaining = self.store.len(),
                "Pruned expired revocations"
            );
        } else {
            debug!(remaining = self.store.len(), "Revocation sweep found nothing to prune");
        }
        removed
    }
}
