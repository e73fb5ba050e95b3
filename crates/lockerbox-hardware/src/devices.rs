//! Enum wrappers for peripheral dispatch.
//!
//! Native `async fn` in traits (RPITIT, Rust Edition 2024) is not object-safe,
//! so `Box<dyn DoorDevice>` is not available. Each device family instead gets an
//! enum with one variant per driver, and the enum implements the trait by
//! forwarding to the active variant.
//!
//! # Examples
//!
//! ```
//! use lockerbox_hardware::devices::AnyKeypadDevice;
//! use lockerbox_hardware::mock::MockKeypad;
//!
//! let (keypad, _handle) = MockKeypad::new();
//! let any_keypad = AnyKeypadDevice::Mock(keypad);
//!
//! // Can now be used polymorphically through the KeypadDevice trait
//! ```

use crate::mock::{MockCamera, MockDoor, MockKeypad, MockLcd, MockScale, MockSound};
use crate::traits::{
    CameraDevice, DoorDevice, KeypadDevice, LcdDevice, ScaleDevice, SoundDevice,
};
use crate::{DeviceInfo, PhotoRef, Result, SoundId};

/// Enum wrapper for door device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDoorDevice {
    /// Mock door for development and testing.
    Mock(MockDoor),
}

impl DoorDevice for AnyDoorDevice {
    async fn set_locked(&mut self, locked: bool) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_locked(locked).await,
        }
    }

    async fn is_closed(&mut self) -> Result<bool> {
        match self {
            Self::Mock(device) => device.is_closed().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for scale device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyScaleDevice {
    /// Mock load cell for development and testing.
    Mock(MockScale),
}

impl ScaleDevice for AnyScaleDevice {
    async fn read_sample(&mut self) -> Result<f64> {
        match self {
            Self::Mock(device) => device.read_sample().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for camera device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCameraDevice {
    /// Mock camera for development and testing.
    Mock(MockCamera),
}

impl CameraDevice for AnyCameraDevice {
    async fn capture(&mut self) -> Result<PhotoRef> {
        match self {
            Self::Mock(device) => device.capture().await,
        }
    }

    async fn delete(&mut self, photo: &PhotoRef) -> Result<()> {
        match self {
            Self::Mock(device) => device.delete(photo).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for keypad device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeypadDevice {
    /// Mock keypad for development and testing.
    Mock(MockKeypad),
}

impl KeypadDevice for AnyKeypadDevice {
    async fn poll_key(&mut self) -> Result<Option<char>> {
        match self {
            Self::Mock(device) => device.poll_key().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for sound device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySoundDevice {
    /// Mock speaker for development and testing.
    Mock(MockSound),
}

impl SoundDevice for AnySoundDevice {
    async fn play(&mut self, sound: SoundId) -> Result<()> {
        match self {
            Self::Mock(device) => device.play(sound).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for LCD device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyLcdDevice {
    /// Mock LCD for development and testing.
    Mock(MockLcd),
}

impl LcdDevice for AnyLcdDevice {
    async fn write_lines(&mut self, line1: &str, line2: &str) -> Result<()> {
        match self {
            Self::Mock(device) => device.write_lines(line1, line2).await,
        }
    }

    async fn clear(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.clear().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_keypad_forwards() {
        let (keypad, handle) = MockKeypad::new();
        let mut any_keypad = AnyKeypadDevice::Mock(keypad);

        handle.send_key('7').await.unwrap();
        assert_eq!(any_keypad.poll_key().await.unwrap(), Some('7'));
        assert_eq!(any_keypad.get_info().await.unwrap().name, "Mock Keypad");
    }

    #[tokio::test]
    async fn test_any_door_forwards() {
        let (door, handle) = MockDoor::new();
        let mut any_door = AnyDoorDevice::Mock(door);

        any_door.set_locked(false).await.unwrap();
        assert!(!handle.is_locked());
        handle.open();
        assert!(!any_door.is_closed().await.unwrap());
    }

    #[tokio::test]
    async fn test_any_lcd_forwards() {
        let (lcd, handle) = MockLcd::new();
        let mut any_lcd = AnyLcdDevice::Mock(lcd);

        any_lcd.write_lines("a", "b").await.unwrap();
        assert_eq!(handle.frames().len(), 1);
    }
}
