//! Kiosk logic for the lockerbox package-drop box.
//!
//! This crate contains the session state machine, the controller loop that
//! drives the peripherals through a session, and the display renderer that
//! drains controller output onto the LCD.

pub mod clock;
pub mod controller;
pub mod display;
pub mod error;
pub mod messages;
pub mod queue;
pub mod renderer;
pub mod session;
pub mod state_machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Controller, ControllerConfig, KioskChannels};
pub use display::{DisplayCommand, DisplayMode, fit_line, truncate_text};
pub use error::{KioskError, Result};
pub use renderer::{DisplayRenderer, RenderStats};
pub use session::{SessionMode, SessionState};
pub use state_machine::{KioskState, StateMachine, StateTransition};
