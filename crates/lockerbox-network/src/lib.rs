//! Network actors for the lockerbox kiosk.
//!
//! This crate talks to the two remote services the kiosk knows about:
//!
//! - **Inventory API**: [`InventoryClient`] lists open items, deletes them and
//!   registers deliveries. [`InventoryPoller`] turns the list into snapshots for
//!   the controller.
//! - **Notification API**: [`NotifyClient`] posts a photo and caption to the
//!   owner's chat.
//!
//! [`OutboundSyncWorker`] executes the controller's queued mutations against
//! both. The controller itself never touches the network.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod notify;
pub mod poller;
pub mod sync;

pub use client::{InventoryClient, OpenItemRecord};
pub use endpoints::{Endpoint, status_message};
pub use error::{ApiError, Result};
pub use notify::NotifyClient;
pub use poller::{InventoryPoller, PollOutcome};
pub use sync::{Delivery, OutboundSyncWorker, SyncStats};
