//! Mock load cell.

use crate::{HardwareError, Result, traits::ScaleDevice, types::DeviceInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Mock scale reporting whatever weight the handle last set.
///
/// # Examples
///
/// ```
/// use lockerbox_hardware::mock::MockScale;
/// use lockerbox_hardware::traits::ScaleDevice;
///
/// #[tokio::main]
/// async fn main() -> lockerbox_hardware::Result<()> {
///     let (mut scale, handle) = MockScale::new(0.2);
///     assert_eq!(scale.read_sample().await?, 0.2);
///
///     handle.set_weight(1.7);
///     assert_eq!(scale.read_sample().await?, 1.7);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockScale {
    weight_rx: watch::Receiver<f64>,
    failing: Arc<AtomicBool>,
}

impl MockScale {
    /// Create a scale holding `initial_kg`.
    pub fn new(initial_kg: f64) -> (Self, MockScaleHandle) {
        let (weight_tx, weight_rx) = watch::channel(initial_kg);
        let failing = Arc::new(AtomicBool::new(false));

        let scale = Self {
            weight_rx,
            failing: Arc::clone(&failing),
        };
        let handle = MockScaleHandle {
            weight_tx: Arc::new(weight_tx),
            failing,
        };

        (scale, handle)
    }
}

impl Default for MockScale {
    fn default() -> Self {
        Self::new(0.0).0
    }
}

impl ScaleDevice for MockScale {
    async fn read_sample(&mut self) -> Result<f64> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::sensor("load cell amplifier not ready"));
        }
        Ok(*self.weight_rx.borrow())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock Scale", "Mock Load Cell v1.0"))
    }
}

/// Handle for changing what a [`MockScale`] reports.
#[derive(Debug, Clone)]
pub struct MockScaleHandle {
    weight_tx: Arc<watch::Sender<f64>>,
    failing: Arc<AtomicBool>,
}

impl MockScaleHandle {
    pub fn set_weight(&self, kg: f64) {
        self.weight_tx.send_replace(kg);
    }

    pub fn weight(&self) -> f64 {
        *self.weight_tx.borrow()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}
