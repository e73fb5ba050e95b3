//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware. Every mock comes with a
//! cloneable handle that plays the role of the outside world.

pub mod camera;
pub mod door;
pub mod keypad;
pub mod lcd;
pub mod scale;
pub mod sound;

// Re-export commonly used types
pub use camera::{MockCamera, MockCameraHandle};
pub use door::{MockDoor, MockDoorHandle};
pub use keypad::{KEYPAD_KEYS, MockKeypad, MockKeypadHandle};
pub use lcd::{LcdFrame, MockLcd, MockLcdHandle};
pub use scale::{MockScale, MockScaleHandle};
pub use sound::{MockSound, MockSoundHandle};
