//! Errors raised inside the kiosk actors.

use lockerbox_hardware::HardwareError;
use thiserror::Error;

/// Failure of one controller step or one render.
///
/// The controller handles every variant the same way: the session is aborted
/// and the kiosk returns to idle.
#[derive(Debug, Error)]
pub enum KioskError {
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Core(#[from] lockerbox_core::Error),

    /// Session data missing for the current state.
    #[error("Inconsistent session: {0}")]
    Session(&'static str),
}

pub type Result<T> = std::result::Result<T, KioskError>;
