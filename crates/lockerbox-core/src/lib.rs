//! Shared domain types for the lockerbox package-drop kiosk.
//!
//! This crate holds the values every actor agrees on: tracking codes, open items
//! and inventory snapshots, the queued server mutations, the configuration file
//! schema, and the common error type.

pub mod config;
pub mod constants;
pub mod error;
pub mod mutation;
pub mod types;

pub use config::KioskConfig;
pub use error::{Error, Result};
pub use mutation::{MutationKind, PendingMutation};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
