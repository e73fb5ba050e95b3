//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated 4x4 matrix keypad that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{HardwareError, Result, traits::KeypadDevice, types::DeviceInfo};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Keys present on the 4x4 matrix keypad, row by row.
pub const KEYPAD_KEYS: [char; 16] = [
    '1', '2', '3', 'A', //
    '4', '5', '6', 'B', //
    '7', '8', '9', 'C', //
    '*', '0', '#', 'D',
];

/// Mock keypad device for testing and development.
///
/// Key presses sent through a [`MockKeypadHandle`] are buffered and handed out
/// one per [`poll_key`](KeypadDevice::poll_key) call, mirroring how a scanned
/// matrix reports at most one key per scan.
///
/// # Examples
///
/// ```
/// use lockerbox_hardware::mock::MockKeypad;
/// use lockerbox_hardware::traits::KeypadDevice;
///
/// #[tokio::main]
/// async fn main() -> lockerbox_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     assert_eq!(keypad.poll_key().await?, None);
///
///     handle.send_keys("55").await?;
///     assert_eq!(keypad.poll_key().await?, Some('5'));
///     assert_eq!(keypad.poll_key().await?, Some('5'));
///     assert_eq!(keypad.poll_key().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated key presses
    key_rx: mpsc::Receiver<char>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::channel(32);

        let keypad = Self {
            key_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { key_tx, name };

        (keypad, handle)
    }
}

impl Default for MockKeypad {
    fn default() -> Self {
        Self::new().0
    }
}

impl KeypadDevice for MockKeypad {
    async fn poll_key(&mut self) -> Result<Option<char>> {
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(HardwareError::disconnected("Keypad input channel closed"))
            }
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock 4x4 Matrix Keypad v1.0"))
    }
}

/// Handle for controlling a mock keypad.
///
/// This handle allows programmatic control of the mock keypad by sending
/// key presses. It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated key presses
    key_tx: mpsc::Sender<char>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Press a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The character is not a key on the matrix
    /// - The keypad has been dropped and the channel is closed
    pub async fn send_key(&self, key: char) -> Result<()> {
        if !KEYPAD_KEYS.contains(&key) {
            return Err(HardwareError::invalid_data(format!(
                "'{key}' is not a keypad key"
            )));
        }

        self.key_tx
            .send(key)
            .await
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Press every key of `keys` in order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failing key.
    pub async fn send_keys(&self, keys: &str) -> Result<()> {
        for key in keys.chars() {
            self.send_key(key).await?;
        }
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
