//! Display renderer actor.
//!
//! A pure consumer: takes [`DisplayCommand`]s off the display queue, validates
//! them and writes them to the LCD. Paged frames are held for the page dwell
//! time before the next command is taken, so a burst of paged messages is shown
//! one after another instead of only the last one.

use crate::display::{DisplayCommand, DisplayMode};
use crate::error::Result;
use lockerbox_hardware::LcdDevice;
use lockerbox_hardware::devices::AnyLcdDevice;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Counters reported when the renderer stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub rendered: u64,
    pub rejected: u64,
    pub failed: u64,
}

/// Drains the display queue onto the LCD.
#[derive(Debug)]
pub struct DisplayRenderer {
    lcd: AnyLcdDevice,
    display_rx: mpsc::Receiver<DisplayCommand>,
    page_dwell: Duration,
}

impl DisplayRenderer {
    pub fn new(
        lcd: AnyLcdDevice,
        display_rx: mpsc::Receiver<DisplayCommand>,
        page_dwell: Duration,
    ) -> Self {
        Self {
            lcd,
            display_rx,
            page_dwell,
        }
    }

    /// Validate and draw one frame.
    ///
    /// # Errors
    ///
    /// Invalid text is rejected before the panel is touched; LCD failures are
    /// passed through.
    pub async fn render(&mut self, command: &DisplayCommand) -> Result<()> {
        command.validate()?;
        self.lcd.write_lines(&command.line1, &command.line2).await?;
        debug!(line1 = %command.line1, line2 = %command.line2, mode = ?command.mode, "Rendered");
        Ok(())
    }

    /// Consume commands until the controller drops its sender.
    pub async fn run(mut self) -> RenderStats {
        info!(page_dwell_ms = self.page_dwell.as_millis() as u64, "Display renderer started");
        if let Err(e) = self.lcd.clear().await {
            error!(error = %e, "Failed to clear LCD");
        }

        let mut stats = RenderStats::default();
        while let Some(command) = self.display_rx.recv().await {
            match self.render(&command).await {
                Ok(()) => {
                    stats.rendered += 1;
                    if command.mode == DisplayMode::Paged {
                        tokio::time::sleep(self.page_dwell).await;
                    }
                }
                Err(crate::error::KioskError::Core(e)) => {
                    stats.rejected += 1;
                    error!(error = %e, command = ?command, "Rejected display command");
                }
                Err(e) => {
                    stats.failed += 1;
                    error!(error = %e, "LCD write failed");
                }
            }
        }

        info!(
            rendered = stats.rendered,
            rejected = stats.rejected,
            failed = stats.failed,
            "Display queue closed, renderer stopping"
        );
        stats
    }
}
