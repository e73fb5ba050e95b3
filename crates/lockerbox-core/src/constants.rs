//! Core constants for the lockerbox kiosk.
//!
//! This module centralizes the fixed limits of the physical device (LCD geometry,
//! keypad code length) and the default timing and sensor values used when the
//! configuration file does not override them.
//!
//! # Usage
//!
//! ```
//! use lockerbox_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(TRACKING_CODE_LENGTH, 4);
//!
//! let door_timeout = Duration::from_secs(DEFAULT_DOOR_TIMEOUT_SECS);
//! assert_eq!(door_timeout.as_secs(), 15);
//! ```

// ============================================================================
// Codes and Credentials
// ============================================================================

/// Number of characters in a tracking code.
///
/// The keypad buffer is evaluated exactly once it holds this many characters.
pub const TRACKING_CODE_LENGTH: usize = 4;

/// Maximum length of the universal (owner) password.
///
/// A longer password is a fatal configuration error: the keypad buffer never
/// grows past [`TRACKING_CODE_LENGTH`], so it could never be entered.
pub const MAX_PASSWORD_LENGTH: usize = TRACKING_CODE_LENGTH;

// ============================================================================
// LCD Geometry
// ============================================================================

/// Number of character columns per LCD line.
///
/// Every display line is validated against this bound by the renderer.
pub const LCD_COLUMNS: usize = 16;

// ============================================================================
// Timing Defaults
// ============================================================================

/// Seconds without a key press before code entry is abandoned.
pub const DEFAULT_KEYPAD_TIMEOUT_SECS: u64 = 15;

/// Seconds between "close the door" warnings while the door stays open.
///
/// This is a soft timeout: the session keeps waiting after each warning.
pub const DEFAULT_DOOR_TIMEOUT_SECS: u64 = 15;

/// Seconds of inactivity before the idle reminder is shown.
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 30;

/// Milliseconds a failure or confirmation message stays visible before the
/// kiosk accepts input again.
pub const DEFAULT_MESSAGE_HOLD_MS: u64 = 3000;

/// Milliseconds a paged display frame is held before the next frame.
pub const DEFAULT_PAGE_DWELL_MS: u64 = 2000;

/// Seconds between inventory polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Seconds before an inventory or notification request is abandoned.
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 10;

/// Milliseconds between controller loop iterations.
pub const DEFAULT_TICK_MS: u64 = 50;

// ============================================================================
// Sensor Defaults
// ============================================================================

/// Weight guard band (kg) absorbing load-cell noise.
///
/// A deposit is accepted only when the measured weight is strictly greater
/// than `baseline + offset`.
pub const DEFAULT_WEIGHT_OFFSET: f64 = 1.0;

/// Raw load-cell samples averaged per weight reading.
pub const DEFAULT_WEIGHT_SAMPLES: usize = 5;

// ============================================================================
// Queues
// ============================================================================

/// Default capacity of every inter-actor queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_longer_than_code() {
        assert!(MAX_PASSWORD_LENGTH <= TRACKING_CODE_LENGTH);
    }

    #[test]
    fn test_lcd_geometry() {
        assert_eq!(LCD_COLUMNS, 16);
    }
}
