//! Mock two-line LCD that keeps a history of every frame written.

use crate::{HardwareError, Result, traits::LcdDevice, types::DeviceInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One screenful of text as the panel showed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcdFrame {
    pub line1: String,
    pub line2: String,
}

impl LcdFrame {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// Whether either line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.line1.contains(needle) || self.line2.contains(needle)
    }
}

/// Mock LCD device.
#[derive(Debug)]
pub struct MockLcd {
    frames: Arc<Mutex<Vec<LcdFrame>>>,
    failing: Arc<AtomicBool>,
}

impl MockLcd {
    pub fn new() -> (Self, MockLcdHandle) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let failing = Arc::new(AtomicBool::new(false));
        (
            Self {
                frames: Arc::clone(&frames),
                failing: Arc::clone(&failing),
            },
            MockLcdHandle { frames, failing },
        )
    }

    fn push(&self, frame: LcdFrame) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::communication("LCD backpack not responding"));
        }
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(frame);
        }
        Ok(())
    }
}

impl Default for MockLcd {
    fn default() -> Self {
        Self::new().0
    }
}

impl LcdDevice for MockLcd {
    async fn write_lines(&mut self, line1: &str, line2: &str) -> Result<()> {
        tracing::debug!(line1, line2, "Mock LCD frame");
        self.push(LcdFrame::new(line1, line2))
    }

    async fn clear(&mut self) -> Result<()> {
        self.push(LcdFrame::new("", ""))
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock LCD", "Mock 16x2 Character LCD v1.0"))
    }
}

/// Handle for reading back what a [`MockLcd`] displayed.
#[derive(Debug, Clone)]
pub struct MockLcdHandle {
    frames: Arc<Mutex<Vec<LcdFrame>>>,
    failing: Arc<AtomicBool>,
}

impl MockLcdHandle {
    /// Every frame written so far, oldest first.
    pub fn frames(&self) -> Vec<LcdFrame> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub fn last_frame(&self) -> Option<LcdFrame> {
        self.frames.lock().ok().and_then(|f| f.last().cloned())
    }

    /// Number of frames containing `needle` on either line.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.frames().iter().filter(|f| f.contains(needle)).count()
    }

    /// Make every subsequent write fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}
