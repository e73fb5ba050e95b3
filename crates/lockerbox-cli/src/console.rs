//! Terminal commands standing in for the courier, the owner and the scale.

use lockerbox_hardware::MockHandles;
use tracing::{info, warn};

/// One line typed into the simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Press these keypad keys in order.
    Keys(String),
    OpenDoor,
    CloseDoor,
    /// Put the scale at this reading (kg).
    Weight(f64),
    Quit,
}

/// Parse a console line. Blank lines and bad weights yield `None`.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    let mut words = line.split_whitespace();

    match words.next()? {
        "open" => Some(Command::OpenDoor),
        "close" => Some(Command::CloseDoor),
        "quit" | "exit" => Some(Command::Quit),
        "weight" => {
            let kg = words.next()?.parse::<f64>().ok()?;
            kg.is_finite().then_some(Command::Weight(kg))
        }
        _ => Some(Command::Keys(line.replace(' ', "").to_uppercase())),
    }
}

/// Apply a command to the mock devices. Returns `false` on quit.
pub async fn apply(devices: &MockHandles, command: Command) -> bool {
    match command {
        Command::Keys(keys) => {
            if let Err(e) = devices.keypad.send_keys(&keys).await {
                warn!(error = %e, "Keypad input rejected");
            }
        }
        Command::OpenDoor => {
            if devices.door.is_locked() {
                warn!("Door is locked");
            } else {
                devices.door.open();
                info!("Door opened");
            }
        }
        Command::CloseDoor => {
            devices.door.close();
            info!("Door closed");
        }
        Command::Weight(kg) => {
            devices.scale.set_weight(kg);
            info!(kg, "Scale load changed");
        }
        Command::Quit => return false,
    }
    true
}
