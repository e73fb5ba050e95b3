//! Outbound server effects queued by the controller.
//!
//! A [`PendingMutation`] is created when a session finalizes and is handed to the
//! outbound sync worker through a bounded queue. Delivery is at-most-once: a
//! mutation that fails is logged and discarded.

use bytes::Bytes;
use chrono::{DateTime, Local};
use std::fmt;

use crate::types::{OpenItem, TrackingCode};

/// One server-side effect awaiting best-effort delivery.
#[derive(Clone, PartialEq)]
pub enum PendingMutation {
    /// Remove the item from the open-item registry.
    DeleteItem { code: TrackingCode },

    /// Record a successful deposit together with the courier photo.
    RegisterSuccess { item: OpenItem, photo: Bytes },

    /// Tell the owner's chat that a package arrived.
    NotifyDelivery {
        item: OpenItem,
        photo: Bytes,
        delivered_at: DateTime<Local>,
    },
}

/// Discriminant of a [`PendingMutation`], used for logging and endpoint lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    DeleteItem,
    RegisterSuccess,
    NotifyDelivery,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteItem => write!(f, "delete-item"),
            Self::RegisterSuccess => write!(f, "register-success"),
            Self::NotifyDelivery => write!(f, "notify-delivery"),
        }
    }
}

impl PendingMutation {
    /// Build the full set of mutations for an accepted deposit.
    pub fn for_deposit(item: OpenItem, photo: Bytes, delivered_at: DateTime<Local>) -> Vec<Self> {
        vec![
            Self::DeleteItem {
                code: item.tracking_code.clone(),
            },
            Self::RegisterSuccess {
                item: item.clone(),
                photo: photo.clone(),
            },
            Self::NotifyDelivery {
                item,
                photo,
                delivered_at,
            },
        ]
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            Self::DeleteItem { .. } => MutationKind::DeleteItem,
            Self::RegisterSuccess { .. } => MutationKind::RegisterSuccess,
            Self::NotifyDelivery { .. } => MutationKind::NotifyDelivery,
        }
    }

    /// Tracking code the mutation refers to.
    pub fn tracking_code(&self) -> &TrackingCode {
        match self {
            Self::DeleteItem { code } => code,
            Self::RegisterSuccess { item, .. } | Self::NotifyDelivery { item, .. } => {
                &item.tracking_code
            }
        }
    }
}

// Photos are large; log their size instead of their bytes.
impl fmt::Debug for PendingMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteItem { code } => f.debug_struct("DeleteItem").field("code", code).finish(),
            Self::RegisterSuccess { item, photo } => f
                .debug_struct("RegisterSuccess")
                .field("item", item)
                .field("photo_bytes", &photo.len())
                .finish(),
            Self::NotifyDelivery {
                item,
                photo,
                delivered_at,
            } => f
                .debug_struct("NotifyDelivery")
                .field("item", item)
                .field("photo_bytes", &photo.len())
                .field("delivered_at", delivered_at)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoe() -> OpenItem {
        OpenItem::new(TrackingCode::new("5555").unwrap(), "shoe", "2024-02-25")
    }

    #[test]
    fn test_for_deposit_builds_all_effects() {
        let mutations = PendingMutation::for_deposit(shoe(), Bytes::from_static(b"jpeg"), Local::now());

        let kinds: Vec<_> = mutations.iter().map(PendingMutation::kind).collect();
        assert_eq!(
            kinds,
            vec![
                MutationKind::DeleteItem,
                MutationKind::RegisterSuccess,
                MutationKind::NotifyDelivery
            ]
        );
        assert!(mutations.iter().all(|m| m.tracking_code().as_str() == "5555"));
    }

    #[test]
    fn test_debug_hides_photo_bytes() {
        let mutation = PendingMutation::RegisterSuccess {
            item: shoe(),
            photo: Bytes::from_static(b"secret-pixels"),
        };
        let debug = format!("{mutation:?}");
        assert!(debug.contains("photo_bytes: 13"));
        assert!(!debug.contains("secret-pixels"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MutationKind::DeleteItem.to_string(), "delete-item");
        assert_eq!(MutationKind::RegisterSuccess.to_string(), "register-success");
        assert_eq!(MutationKind::NotifyDelivery.to_string(), "notify-delivery");
    }
}
