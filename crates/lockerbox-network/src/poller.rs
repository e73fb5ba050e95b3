//! Periodic inventory poller.
//!
//! Fetches the open-item list on a fixed interval and publishes a new
//! [`InventorySnapshot`] to the controller only when it differs from the last
//! one published. Failures never clear the controller's view: the previous
//! snapshot simply stays in force.
//!
//! ```text
//! Inventory API ──GET──> InventoryPoller ──(changed only, try_send)──> Controller
//! ```

use crate::client::InventoryClient;
use lockerbox_core::InventorySnapshot;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A changed snapshot with this many items was queued.
    Published(usize),
    /// Server returned the same items as last time; nothing queued.
    Unchanged,
    /// Snapshot changed but the queue was full; retried next poll.
    Dropped,
    /// Request failed; previous snapshot kept.
    Failed,
    /// Controller is gone.
    Closed,
}

/// Polls the inventory API and feeds the snapshot queue.
#[derive(Debug)]
pub struct InventoryPoller {
    client: InventoryClient,
    snapshot_tx: mpsc::Sender<InventorySnapshot>,
    interval: Duration,
    last_published: Option<InventorySnapshot>,
}

impl InventoryPoller {
    pub fn new(
        client: InventoryClient,
        snapshot_tx: mpsc::Sender<InventorySnapshot>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            snapshot_tx,
            interval,
            last_published: None,
        }
    }

    /// Last snapshot successfully handed to the controller.
    pub fn last_published(&self) -> Option<&InventorySnapshot> {
        self.last_published.as_ref()
    }

    /// Fetch once and publish if changed.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let records = match self.client.list_open_items().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Inventory poll failed, keeping previous snapshot");
                return PollOutcome::Failed;
            }
        };

        let snapshot: InventorySnapshot = records
            .into_iter()
            .filter_map(|record| {
                let raw_code = record.tracking_code.clone();
                match record.into_item() {
                    Ok(item) => Some(item),
                    Err(e) => {
                        warn!(code = %raw_code, error = %e, "Skipping open item with malformed tracking code");
                        None
                    }
                }
            })
            .collect();

        if self.last_published.as_ref() == Some(&snapshot) {
            debug!(items = snapshot.len(), "Inventory unchanged");
            return PollOutcome::Unchanged;
        }

        let items = snapshot.len();
        match self.snapshot_tx.try_send(snapshot.clone()) {
            Ok(()) => {
                info!(items, "Published inventory snapshot");
                self.last_published = Some(snapshot);
                PollOutcome::Published(items)
            }
            Err(TrySendError::Full(_)) => {
                warn!(items, "Snapshot queue full, dropping snapshot");
                PollOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => PollOutcome::Closed,
        }
    }

    /// Poll forever on the configured interval.
    ///
    /// Returns when the controller drops its receiver.
    pub async fn run(mut self) {
        info!(interval_ms = self.interval.as_millis() as u64, "Inventory poller started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if self.poll_once().await == PollOutcome::Closed {
                info!("Snapshot receiver closed, inventory poller stopping");
                break;
            }
        }
    }
}
