//! Peripheral abstraction layer for the lockerbox package-drop kiosk.
//!
//! This crate provides trait-based abstractions for the devices mounted in the
//! box: the door lock and reed switch, the load cell under the shelf, the
//! courier camera, the matrix keypad, the speaker and the 16x2 LCD. Mock
//! implementations with control handles make the whole kiosk runnable and
//! testable without hardware.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: Concrete drivers are selected through the `Any*Device`
//!   enums in [`devices`], since RPITIT traits are not object-safe.
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with [`HardwareError`].
//!
//! # Example
//!
//! ```no_run
//! use lockerbox_hardware::traits::DoorDevice;
//! use lockerbox_hardware::error::Result;
//!
//! async fn wait_for_close<D: DoorDevice>(door: &mut D) -> Result<()> {
//!     while !door.is_closed().await? {
//!         tokio::time::sleep(std::time::Duration::from_millis(50)).await;
//!     }
//!     door.set_locked(true).await
//! }
//! ```
//!
//! The controller does not use the traits directly; it talks to the
//! [`Peripherals`](facade::Peripherals) facade.

pub mod devices;
pub mod error;
pub mod facade;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use facade::{DeviceType, MockHandles, MockKit, Peripherals, PeripheralsBuilder};
pub use traits::{CameraDevice, DoorDevice, KeypadDevice, LcdDevice, ScaleDevice, SoundDevice};
pub use types::{DeviceInfo, PhotoRef, SoundId};
