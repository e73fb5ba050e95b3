//! Per-session data owned by the controller.

use lockerbox_core::OpenItem;
use lockerbox_core::constants::TRACKING_CODE_LENGTH;
use lockerbox_hardware::PhotoRef;
use std::time::Instant;

/// What the current session turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Still collecting a code, or no session at all.
    #[default]
    None,
    /// A courier is dropping off an open item.
    Deposit,
    /// The owner is emptying the box.
    OwnerPickup,
}

/// Transient state of one kiosk session.
///
/// Everything except the weight baseline is cleared by [`reset`](Self::reset);
/// the baseline describes the box, not the session.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Keys typed so far (never more than four).
    pub buffer: String,
    pub mode: SessionMode,
    /// Weight of the box contents after the last successful session.
    pub baseline: f64,
    /// Code entry is abandoned when the clock passes this point.
    pub code_deadline: Option<Instant>,
    /// Next "close the door" warning is due at this point.
    pub door_deadline: Option<Instant>,
    /// The door has been observed open since it was unlocked.
    pub door_seen_open: bool,
    /// The open item being deposited.
    pub item: Option<OpenItem>,
    /// Courier photo awaiting upload or deletion.
    pub photo: Option<PhotoRef>,
}

impl SessionState {
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            ..Self::default()
        }
    }

    /// Append a key to the buffer. Keys beyond the code length are ignored.
    ///
    /// Returns `true` once the buffer holds a full code.
    pub fn push_key(&mut self, key: char) -> bool {
        if !self.is_code_complete() {
            self.buffer.push(key);
        }
        self.is_code_complete()
    }

    pub fn is_code_complete(&self) -> bool {
        self.buffer.chars().count() >= TRACKING_CODE_LENGTH
    }

    /// Clear everything but the baseline.
    pub fn reset(&mut self) {
        *self = Self::new(self.baseline);
    }
}
