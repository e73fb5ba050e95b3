//! Outbound sync worker.
//!
//! Drains the controller's mutation queue and executes each mutation against the
//! inventory or notification API. Delivery is at-most-once: a failed mutation is
//! logged and discarded, never retried.

use crate::client::InventoryClient;
use crate::endpoints;
use crate::error::Result;
use crate::notify::NotifyClient;
use lockerbox_core::PendingMutation;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What happened to one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Notification mutation with no notification target configured.
    Skipped,
}

/// Counters reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub sent: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Executes queued [`PendingMutation`]s.
#[derive(Debug)]
pub struct OutboundSyncWorker {
    inventory: InventoryClient,
    notify: Option<NotifyClient>,
    mutation_rx: mpsc::Receiver<PendingMutation>,
}

impl OutboundSyncWorker {
    pub fn new(
        inventory: InventoryClient,
        notify: Option<NotifyClient>,
        mutation_rx: mpsc::Receiver<PendingMutation>,
    ) -> Self {
        Self {
            inventory,
            notify,
            mutation_rx,
        }
    }

    /// Perform one mutation.
    pub async fn execute(&self, mutation: &PendingMutation) -> Result<Delivery> {
        match mutation {
            PendingMutation::DeleteItem { code } => {
                self.inventory.delete_item(code).await?;
            }
            PendingMutation::RegisterSuccess { item, photo } => {
                let echoed = self.inventory.register_success(item, photo.clone()).await?;
                debug!(echoed = ?echoed, "Delivery registered");
            }
            PendingMutation::NotifyDelivery {
                item,
                photo,
                delivered_at,
            } => {
                let Some(notify) = &self.notify else {
                    return Ok(Delivery::Skipped);
                };
                notify
                    .send_delivery(item, photo.clone(), delivered_at)
                    .await?;
            }
        }
        Ok(Delivery::Sent)
    }

    /// Consume mutations until the controller drops its sender.
    pub async fn run(mut self) -> SyncStats {
        info!(
            notifications = self.notify.is_some(),
            "Outbound sync worker started"
        );
        let mut stats = SyncStats::default();

        while let Some(mutation) = self.mutation_rx.recv().await {
            let kind = mutation.kind();
            let endpoint = endpoints::for_mutation(kind);
            let code = mutation.tracking_code().clone();

            match self.execute(&mutation).await {
                Ok(Delivery::Sent) => {
                    stats.sent += 1;
                    info!(kind = %kind, code = %code, method = %endpoint.method, "Mutation delivered");
                }
                Ok(Delivery::Skipped) => {
                    stats.skipped += 1;
                    debug!(kind = %kind, code = %code, "No notification target, mutation skipped");
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(kind = %kind, code = %code, error = %e, "Mutation failed, discarding");
                }
            }
        }

        info!(
            sent = stats.sent,
            skipped = stats.skipped,
            failed = stats.failed,
            "Mutation queue closed, outbound sync worker stopping"
        );
        stats
    }
}
