//! Time source for the controller.
//!
//! The controller never calls `Instant::now()` directly. Production code uses
//! [`SystemClock`]; tests use [`ManualClock`] and advance it explicitly, which
//! makes 15-second timeouts testable in microseconds.

use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A monotonic clock plus wall-clock time for timestamps.
pub trait Clock: Send + Sync {
    /// Monotonic time used for every deadline.
    fn now(&self) -> Instant;

    /// Wall-clock time used for delivery timestamps.
    fn local_time(&self) -> DateTime<Local>;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug)]
struct ManualTime {
    instant: Instant,
    local: DateTime<Local>,
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one clone and hand another
/// to the controller.
///
/// # Examples
///
/// ```
/// use lockerbox_kiosk::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(15));
/// assert_eq!(clock.now() - start, Duration::from_secs(15));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<ManualTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            time: Arc::new(Mutex::new(ManualTime {
                instant: Instant::now(),
                local: Local::now(),
            })),
        }
    }

    /// Move both monotonic and wall-clock time forward.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut time) = self.time.lock() {
            time.instant += by;
            if let Ok(delta) = chrono::Duration::from_std(by) {
                time.local += delta;
            }
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.time.lock() {
            Ok(time) => time.instant,
            Err(poisoned) => poisoned.into_inner().instant,
        }
    }

    fn local_time(&self) -> DateTime<Local> {
        match self.time.lock() {
            Ok(time) => time.local,
            Err(poisoned) => poisoned.into_inner().local,
        }
    }
}
