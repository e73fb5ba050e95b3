//! Every fixed text the kiosk shows.

use crate::display::DisplayCommand;

/// A two-line message known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text {
    pub line1: &'static str,
    pub line2: &'static str,
}

impl Text {
    pub const fn new(line1: &'static str, line2: &'static str) -> Self {
        Self { line1, line2 }
    }

    pub fn show(&self) -> DisplayCommand {
        DisplayCommand::static_text(self.line1, self.line2)
    }

    pub fn page(&self) -> DisplayCommand {
        DisplayCommand::paged(self.line1, self.line2)
    }
}

pub const IDLE_REMINDER: Text = Text::new("Enter code", "to open the box");
pub const CODE_PROMPT: &str = "Code:";
pub const CODE_REJECTED: Text = Text::new("Tracking code", "not recognised");
pub const KEYPAD_TIMEOUT: Text = Text::new("Timed out", "Please try again");

pub const DEPOSIT_FOR: &str = "Deposit for";
pub const POSE_FOR_PHOTO: Text = Text::new("Look at camera", "Taking photo...");
pub const PLACE_ITEM: Text = Text::new("Place package", "and close door");
pub const NO_ITEM: Text = Text::new("No item received", "Door locked");

pub const OWNER_OPEN: Text = Text::new("Box unlocked", "Close when done");
pub const PICKUP_DONE: Text = Text::new("Delete picked-up", "items in app");

pub const CLOSE_DOOR: Text = Text::new("Please close", "the door");
pub const THANK_YOU: Text = Text::new("Thank you!", "Have a nice day");
pub const DEVICE_ERROR: Text = Text::new("Device error", "Please try again");

/// Every fixed message, for validation.
pub const ALL: [Text; 12] = [
    IDLE_REMINDER,
    CODE_REJECTED,
    KEYPAD_TIMEOUT,
    POSE_FOR_PHOTO,
    PLACE_ITEM,
    NO_ITEM,
    OWNER_OPEN,
    PICKUP_DONE,
    CLOSE_DOOR,
    THANK_YOU,
    DEVICE_ERROR,
    Text::new(CODE_PROMPT, DEPOSIT_FOR),
];
