//! Mock door with a lock actuator and reed switch.
//!
//! The handle plays the part of the person in front of the box: it opens and
//! closes the door and observes the lock state the controller commanded.

use crate::{HardwareError, Result, traits::DoorDevice, types::DeviceInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Mock door device.
///
/// Starts closed and locked.
///
/// # Examples
///
/// ```
/// use lockerbox_hardware::mock::MockDoor;
/// use lockerbox_hardware::traits::DoorDevice;
///
/// #[tokio::main]
/// async fn main() -> lockerbox_hardware::Result<()> {
///     let (mut door, handle) = MockDoor::new();
///
///     door.set_locked(false).await?;
///     assert!(!handle.is_locked());
///
///     handle.open();
///     assert!(!door.is_closed().await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDoor {
    closed_rx: watch::Receiver<bool>,
    locked_tx: watch::Sender<bool>,
    failing: Arc<AtomicBool>,
}

impl MockDoor {
    /// Create a closed, locked door and its control handle.
    pub fn new() -> (Self, MockDoorHandle) {
        let (closed_tx, closed_rx) = watch::channel(true);
        let (locked_tx, locked_rx) = watch::channel(true);
        let failing = Arc::new(AtomicBool::new(false));

        let door = Self {
            closed_rx,
            locked_tx,
            failing: Arc::clone(&failing),
        };
        let handle = MockDoorHandle {
            closed_tx: Arc::new(closed_tx),
            locked_rx,
            failing,
        };

        (door, handle)
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::communication("door controller not responding"));
        }
        Ok(())
    }
}

impl DoorDevice for MockDoor {
    async fn set_locked(&mut self, locked: bool) -> Result<()> {
        self.check_failing()?;
        self.locked_tx.send_replace(locked);
        Ok(())
    }

    async fn is_closed(&mut self) -> Result<bool> {
        self.check_failing()?;
        Ok(*self.closed_rx.borrow())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock Door", "Mock Lock + Reed Switch v1.0"))
    }
}

/// Handle for driving a [`MockDoor`] from tests or the simulator.
#[derive(Debug, Clone)]
pub struct MockDoorHandle {
    closed_tx: Arc<watch::Sender<bool>>,
    locked_rx: watch::Receiver<bool>,
    failing: Arc<AtomicBool>,
}

impl MockDoorHandle {
    /// Swing the door open. Opening a locked door is allowed; the mock does
    /// not model the latch physically.
    pub fn open(&self) {
        self.closed_tx.send_replace(false);
    }

    pub fn close(&self) {
        self.closed_tx.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed_tx.borrow()
    }

    /// Last lock state commanded by the controller.
    pub fn is_locked(&self) -> bool {
        *self.locked_rx.borrow()
    }

    /// Make every subsequent device call fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state() {
        let (mut door, handle) = MockDoor::new();
        assert!(door.is_closed().await.unwrap());
        assert!(handle.is_locked());
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_lock_state_visible_to_handle() {
        let (mut door, handle) = MockDoor::new();

        door.set_locked(false).await.unwrap();
        assert!(!handle.is_locked());

        door.set_locked(true).await.unwrap();
        assert!(handle.is_locked());
    }

    #[tokio::test]
    async fn test_open_close_cycle() {
        let (mut door, handle) = MockDoor::new();

        handle.open();
        assert!(!door.is_closed().await.unwrap());

        handle.close();
        assert!(door.is_closed().await.unwrap());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let (mut door, handle) = MockDoor::new();

        handle.set_failing(true);
        assert!(door.is_closed().await.is_err());
        assert!(door.set_locked(true).await.is_err());

        handle.set_failing(false);
        assert!(door.is_closed().await.is_ok());
    }
}
