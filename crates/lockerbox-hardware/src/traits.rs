//! Peripheral trait definitions.
//!
//! This module defines the contract between the kiosk controller and the
//! physical box: door lock and reed switch, load cell, camera, keypad, speaker
//! and character LCD. Mock and real drivers implement the same traits, so the
//! controller never knows which one it is talking to.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DeviceInfo, PhotoRef, SoundId};

/// Trait for the door lock and its closed-position sensor.
///
/// # Examples
///
/// ```no_run
/// use lockerbox_hardware::traits::DoorDevice;
/// use lockerbox_hardware::error::Result;
///
/// async fn release<D: DoorDevice>(door: &mut D) -> Result<bool> {
///     door.set_locked(false).await?;
///     door.is_closed().await
/// }
/// ```
pub trait DoorDevice: Send + Sync {
    /// Engage (`true`) or release (`false`) the lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator cannot be driven.
    async fn set_locked(&mut self, locked: bool) -> Result<()>;

    /// Read the reed switch: `true` when the door is shut.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor cannot be read.
    async fn is_closed(&mut self) -> Result<bool>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Trait for the load cell under the parcel shelf.
pub trait ScaleDevice: Send + Sync {
    /// Take one raw weight sample in kilograms.
    ///
    /// Samples are noisy; callers average several of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the amplifier is not ready or returns garbage.
    async fn read_sample(&mut self) -> Result<f64>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Trait for the courier-facing camera.
pub trait CameraDevice: Send + Sync {
    /// Capture a still image and store it locally.
    ///
    /// # Errors
    ///
    /// Returns an error if no frame could be captured or written.
    async fn capture(&mut self) -> Result<PhotoRef>;

    /// Remove a previously captured image from local storage.
    ///
    /// Deleting a photo that is already gone is not an error.
    async fn delete(&mut self, photo: &PhotoRef) -> Result<()>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Trait for the matrix keypad.
///
/// Unlike a blocking reader, the kiosk keypad is scanned: each call returns
/// immediately with the key pressed since the last scan, if any.
pub trait KeypadDevice: Send + Sync {
    /// Return the next pending key, or `None` when no key was pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad is disconnected.
    async fn poll_key(&mut self) -> Result<Option<char>>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Trait for the speaker.
pub trait SoundDevice: Send + Sync {
    /// Start playing a prompt without waiting for it to finish.
    async fn play(&mut self, sound: SoundId) -> Result<()>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Trait for the two-line character LCD.
pub trait LcdDevice: Send + Sync {
    /// Replace the screen contents with two lines of text.
    ///
    /// Lines are expected to fit the panel; drivers do not wrap.
    async fn write_lines(&mut self, line1: &str, line2: &str) -> Result<()>;

    /// Blank the screen.
    async fn clear(&mut self) -> Result<()>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}
