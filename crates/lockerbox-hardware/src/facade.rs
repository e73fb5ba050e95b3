//! Peripheral facade used by the kiosk controller.
//!
//! [`Peripherals`] groups the door, scale, camera, keypad and speaker behind the
//! handful of high-level operations a session needs: unlock, lock, read the
//! door switch, weigh, read a key, take and discard a photo, play a prompt. The
//! LCD is not part of the facade; it belongs to the display renderer.
//!
//! # Examples
//!
//! ```
//! use lockerbox_hardware::facade::MockKit;
//!
//! #[tokio::main]
//! async fn main() -> lockerbox_hardware::Result<()> {
//!     let dir = std::env::temp_dir().join("lockerbox-doc-facade");
//!     let MockKit { mut peripherals, handles, .. } = MockKit::new(&dir, 5)?;
//!
//!     handles.scale.set_weight(0.4);
//!     assert_eq!(peripherals.weight().await?, 0.4);
//!
//!     peripherals.unlock_door().await?;
//!     assert!(!handles.door.is_locked());
//!     Ok(())
//! }
//! ```

use crate::devices::{
    AnyCameraDevice, AnyDoorDevice, AnyKeypadDevice, AnyLcdDevice, AnyScaleDevice, AnySoundDevice,
};
use crate::mock::{
    MockCamera, MockCameraHandle, MockDoor, MockDoorHandle, MockKeypad, MockKeypadHandle, MockLcd,
    MockLcdHandle, MockScale, MockScaleHandle, MockSound, MockSoundHandle,
};
use crate::traits::{CameraDevice, DoorDevice, KeypadDevice, ScaleDevice, SoundDevice};
use crate::{HardwareError, PhotoRef, Result, SoundId};
use std::path::Path;

/// Type of peripheral device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Door,
    Scale,
    Camera,
    Keypad,
    Sound,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Door => write!(f, "Door"),
            Self::Scale => write!(f, "Scale"),
            Self::Camera => write!(f, "Camera"),
            Self::Keypad => write!(f, "Keypad"),
            Self::Sound => write!(f, "Sound"),
        }
    }
}

/// The set of devices a kiosk session drives.
#[derive(Debug)]
pub struct Peripherals {
    door: AnyDoorDevice,
    scale: AnyScaleDevice,
    camera: AnyCameraDevice,
    keypad: AnyKeypadDevice,
    sound: AnySoundDevice,
    weight_samples: usize,
}

impl Peripherals {
    /// Start registering devices.
    pub fn builder() -> PeripheralsBuilder {
        PeripheralsBuilder::default()
    }

    /// Release the door lock.
    pub async fn unlock_door(&mut self) -> Result<()> {
        self.door.set_locked(false).await?;
        tracing::debug!("Door unlocked");
        Ok(())
    }

    /// Engage the door lock.
    pub async fn lock_door(&mut self) -> Result<()> {
        self.door.set_locked(true).await?;
        tracing::debug!("Door locked");
        Ok(())
    }

    /// `true` when the reed switch reports the door shut.
    pub async fn door_closed(&mut self) -> Result<bool> {
        self.door.is_closed().await
    }

    /// Average of `weight_samples` raw readings in kg, rounded to two decimals.
    ///
    /// # Errors
    ///
    /// Returns an error if any sample fails or is not a finite number.
    pub async fn weight(&mut self) -> Result<f64> {
        let mut total = 0.0;
        for _ in 0..self.weight_samples {
            let sample = self.scale.read_sample().await?;
            if !sample.is_finite() {
                return Err(HardwareError::invalid_data(format!(
                    "scale returned non-finite sample {sample}"
                )));
            }
            total += sample;
        }

        let average = total / self.weight_samples as f64;
        Ok((average * 100.0).round() / 100.0)
    }

    /// Next pending key press, if any.
    pub async fn read_key_char(&mut self) -> Result<Option<char>> {
        self.keypad.poll_key().await
    }

    pub async fn capture_photo(&mut self) -> Result<PhotoRef> {
        let photo = self.camera.capture().await?;
        tracing::info!(path = %photo.path().display(), bytes = photo.bytes().len(), "Photo captured");
        Ok(photo)
    }

    pub async fn delete_photo(&mut self, photo: &PhotoRef) -> Result<()> {
        self.camera.delete(photo).await
    }

    pub async fn play_sound(&mut self, sound: SoundId) -> Result<()> {
        self.sound.play(sound).await
    }

    /// Log the identity of every registered device.
    pub async fn log_devices(&self) {
        let infos = [
            (DeviceType::Door, self.door.get_info().await),
            (DeviceType::Scale, self.scale.get_info().await),
            (DeviceType::Camera, self.camera.get_info().await),
            (DeviceType::Keypad, self.keypad.get_info().await),
            (DeviceType::Sound, self.sound.get_info().await),
        ];

        for (device_type, info) in infos {
            match info {
                Ok(info) => tracing::info!(device = %device_type, info = %info, "Peripheral ready"),
                Err(e) => tracing::warn!(device = %device_type, error = %e, "Peripheral info unavailable"),
            }
        }
    }
}

/// Collects devices for a [`Peripherals`] set.
///
/// # Errors
///
/// [`build`](Self::build) fails if any device is missing or the sample count is
/// zero.
#[derive(Debug, Default)]
pub struct PeripheralsBuilder {
    door: Option<AnyDoorDevice>,
    scale: Option<AnyScaleDevice>,
    camera: Option<AnyCameraDevice>,
    keypad: Option<AnyKeypadDevice>,
    sound: Option<AnySoundDevice>,
    weight_samples: Option<usize>,
}

impl PeripheralsBuilder {
    pub fn register_door(mut self, door: AnyDoorDevice) -> Self {
        self.door = Some(door);
        self
    }

    pub fn register_scale(mut self, scale: AnyScaleDevice) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn register_camera(mut self, camera: AnyCameraDevice) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn register_keypad(mut self, keypad: AnyKeypadDevice) -> Self {
        self.keypad = Some(keypad);
        self
    }

    pub fn register_sound(mut self, sound: AnySoundDevice) -> Self {
        self.sound = Some(sound);
        self
    }

    /// Raw samples averaged per weight reading.
    pub fn weight_samples(mut self, samples: usize) -> Self {
        self.weight_samples = Some(samples);
        self
    }

    pub fn build(self) -> Result<Peripherals> {
        fn require<T>(device: Option<T>, device_type: DeviceType) -> Result<T> {
            device.ok_or_else(|| {
                HardwareError::configuration(format!("{device_type} device not registered"))
            })
        }

        let weight_samples = self
            .weight_samples
            .unwrap_or(lockerbox_core::constants::DEFAULT_WEIGHT_SAMPLES);
        if weight_samples == 0 {
            return Err(HardwareError::configuration(
                "weight_samples must be at least 1",
            ));
        }

        Ok(Peripherals {
            door: require(self.door, DeviceType::Door)?,
            scale: require(self.scale, DeviceType::Scale)?,
            camera: require(self.camera, DeviceType::Camera)?,
            keypad: require(self.keypad, DeviceType::Keypad)?,
            sound: require(self.sound, DeviceType::Sound)?,
            weight_samples,
        })
    }
}

/// Control handles for a fully mocked kiosk.
#[derive(Debug, Clone)]
pub struct MockHandles {
    pub door: MockDoorHandle,
    pub scale: MockScaleHandle,
    pub camera: MockCameraHandle,
    pub keypad: MockKeypadHandle,
    pub sound: MockSoundHandle,
    pub lcd: MockLcdHandle,
}

/// A complete mock device set: the facade, the LCD, and their handles.
#[derive(Debug)]
pub struct MockKit {
    pub peripherals: Peripherals,
    pub lcd: AnyLcdDevice,
    pub handles: MockHandles,
}

impl MockKit {
    /// Build mocks with an empty scale and photos stored under `photo_dir`.
    ///
    /// # Errors
    ///
    /// Fails if `weight_samples` is zero.
    pub fn new(photo_dir: impl AsRef<Path>, weight_samples: usize) -> Result<Self> {
        let (door, door_handle) = MockDoor::new();
        let (scale, scale_handle) = MockScale::new(0.0);
        let (camera, camera_handle) = MockCamera::new(photo_dir.as_ref());
        let (keypad, keypad_handle) = MockKeypad::new();
        let (sound, sound_handle) = MockSound::new();
        let (lcd, lcd_handle) = MockLcd::new();

        let peripherals = Peripherals::builder()
            .register_door(AnyDoorDevice::Mock(door))
            .register_scale(AnyScaleDevice::Mock(scale))
            .register_camera(AnyCameraDevice::Mock(camera))
            .register_keypad(AnyKeypadDevice::Mock(keypad))
            .register_sound(AnySoundDevice::Mock(sound))
            .weight_samples(weight_samples)
            .build()?;

        Ok(Self {
            peripherals,
            lcd: AnyLcdDevice::Mock(lcd),
            handles: MockHandles {
                door: door_handle,
                scale: scale_handle,
                camera: camera_handle,
                keypad: keypad_handle,
                sound: sound_handle,
                lcd: lcd_handle,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kit() -> (MockKit, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (MockKit::new(dir.path(), 5).unwrap(), dir)
    }

    #[tokio::test]
    async fn test_builder_requires_every_device() {
        let (door, _) = MockDoor::new();
        let err = Peripherals::builder()
            .register_door(AnyDoorDevice::Mock(door))
            .build()
            .unwrap_err();

        assert!(matches!(err, HardwareError::ConfigurationError { .. }));
        assert!(err.to_string().contains("Scale"));
    }

    #[test]
    fn test_kit_rejects_zero_samples() {
        let dir = tempfile::tempdir().unwrap();
        let err = MockKit::new(dir.path(), 0).unwrap_err();

        assert!(matches!(err, HardwareError::ConfigurationError { .. }));
        assert!(err.to_string().contains("weight_samples"));
    }

    #[tokio::test]
    async fn test_lock_cycle() {
        let (MockKit { mut peripherals, handles, .. }, _dir) = kit();

        peripherals.unlock_door().await.unwrap();
        assert!(!handles.door.is_locked());
        peripherals.lock_door().await.unwrap();
        assert!(handles.door.is_locked());
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(1.0, 1.0)]
    #[case(1.234, 1.23)]
    #[case(2.005_1, 2.01)]
    #[tokio::test]
    async fn test_weight_is_rounded(#[case] raw: f64, #[case] expected: f64) {
        let (MockKit { mut peripherals, handles, .. }, _dir) = kit();

        handles.scale.set_weight(raw);
        assert_eq!(peripherals.weight().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_weight_rejects_nan() {
        let (MockKit { mut peripherals, handles, .. }, _dir) = kit();

        handles.scale.set_weight(f64::NAN);
        assert!(matches!(
            peripherals.weight().await,
            Err(HardwareError::InvalidData { .. })
        ));
    }

    #[tokio::test]
    async fn test_photo_roundtrip_and_sound() {
        let (MockKit { mut peripherals, handles, .. }, _dir) = kit();

        let photo = peripherals.capture_photo().await.unwrap();
        assert!(photo.path().exists());
        peripherals.delete_photo(&photo).await.unwrap();
        assert!(!photo.path().exists());

        peripherals.play_sound(SoundId::Accepted).await.unwrap();
        assert_eq!(handles.sound.played(), vec![SoundId::Accepted]);
    }

    #[tokio::test]
    async fn test_read_key_char() {
        let (MockKit { mut peripherals, handles, .. }, _dir) = kit();

        assert_eq!(peripherals.read_key_char().await.unwrap(), None);
        handles.keypad.send_key('#').await.unwrap();
        assert_eq!(peripherals.read_key_char().await.unwrap(), Some('#'));
    }
}
