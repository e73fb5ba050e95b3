//! Mock speaker that records every prompt it is asked to play.

use crate::{HardwareError, Result, traits::SoundDevice, types::DeviceInfo, types::SoundId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock sound device.
#[derive(Debug)]
pub struct MockSound {
    played: Arc<Mutex<Vec<SoundId>>>,
    failing: Arc<AtomicBool>,
}

impl MockSound {
    pub fn new() -> (Self, MockSoundHandle) {
        let played = Arc::new(Mutex::new(Vec::new()));
        let failing = Arc::new(AtomicBool::new(false));
        (
            Self {
                played: Arc::clone(&played),
                failing: Arc::clone(&failing),
            },
            MockSoundHandle { played, failing },
        )
    }
}

impl Default for MockSound {
    fn default() -> Self {
        Self::new().0
    }
}

impl SoundDevice for MockSound {
    async fn play(&mut self, sound: SoundId) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::communication("audio output not responding"));
        }
        tracing::debug!(sound = %sound, "Mock sound played");
        if let Ok(mut played) = self.played.lock() {
            played.push(sound);
        }
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock Speaker", "Mock Audio v1.0"))
    }
}

/// Handle for inspecting what a [`MockSound`] played.
#[derive(Debug, Clone)]
pub struct MockSoundHandle {
    played: Arc<Mutex<Vec<SoundId>>>,
    failing: Arc<AtomicBool>,
}

impl MockSoundHandle {
    /// All prompts played so far, oldest first.
    pub fn played(&self) -> Vec<SoundId> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// How many times `sound` was played.
    pub fn count(&self, sound: SoundId) -> usize {
        self.played().iter().filter(|&&s| s == sound).count()
    }

    pub fn clear(&self) {
        if let Ok(mut played) = self.played.lock() {
            played.clear();
        }
    }

    /// Make every subsequent playback fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}
