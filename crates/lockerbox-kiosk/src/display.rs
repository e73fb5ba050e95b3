//! Display commands for the 16x2 kiosk LCD.
//!
//! # Character Encoding - ASCII Only
//!
//! The panel's character ROM only covers printable ASCII (0x20-0x7E). A
//! [`DisplayCommand`] carrying anything else, or a line longer than
//! [`LCD_COLUMNS`], is rejected by [`validate`](DisplayCommand::validate) and
//! never reaches the panel. Text that comes from outside the kiosk (item
//! descriptions from the server) must go through [`fit_line`] first.
//!
//! # Examples
//!
//! ```
//! use lockerbox_kiosk::display::{DisplayCommand, DisplayMode, fit_line};
//!
//! let command = DisplayCommand::paged("Deposit for", fit_line("Running shoes, size 44"));
//! assert_eq!(command.mode, DisplayMode::Paged);
//! assert_eq!(command.line2, "Running shoes, s");
//! assert!(command.validate().is_ok());
//! ```

use lockerbox_core::constants::LCD_COLUMNS;
use lockerbox_core::{Error, Result};

/// How the renderer treats a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Render and move straight on to the next command.
    Static,
    /// Render, then keep the frame up for the page dwell time.
    Paged,
}

/// One frame for the LCD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCommand {
    pub mode: DisplayMode,
    pub line1: String,
    pub line2: String,
}

impl DisplayCommand {
    pub fn new(mode: DisplayMode, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            mode,
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// A frame that may be replaced immediately.
    pub fn static_text(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self::new(DisplayMode::Static, line1, line2)
    }

    /// A frame that stays visible for the page dwell time.
    pub fn paged(line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self::new(DisplayMode::Paged, line1, line2)
    }

    /// Check both lines against the panel's limits.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` naming the first offending line (0-based).
    pub fn validate(&self) -> Result<()> {
        validate_line(0, &self.line1)?;
        validate_line(1, &self.line2)
    }
}

fn is_printable(c: char) -> bool {
    matches!(c, ' '..='~')
}

fn validate_line(line: usize, text: &str) -> Result<()> {
    if let Some(bad) = text.chars().find(|&c| !is_printable(c)) {
        return Err(Error::validation(
            line,
            format!("character {bad:?} is not printable ASCII"),
        ));
    }

    let len = text.chars().count();
    if len > LCD_COLUMNS {
        return Err(Error::validation(
            line,
            format!("{len} characters exceed {LCD_COLUMNS} columns"),
        ));
    }

    Ok(())
}

/// Truncate text to at most `max_chars` characters.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Make arbitrary text safe for one LCD line.
///
/// Control characters are dropped, other non-ASCII characters become `?`,
/// surrounding whitespace is trimmed and the result is cut to the panel width.
pub fn fit_line(text: &str) -> String {
    let sanitized: String = text
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if is_printable(c) { c } else { '?' })
        .collect();
    truncate_text(sanitized.trim(), LCD_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_valid_command() {
        let command = DisplayCommand::static_text("Enter code", "to open the box");
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_empty_lines_are_valid() {
        assert!(DisplayCommand::static_text("", "").validate().is_ok());
    }

    #[test]
    fn test_exactly_sixteen_columns() {
        let command = DisplayCommand::static_text("1234567890123456", "No item received");
        assert!(command.validate().is_ok());
    }

    #[rstest]
    #[case("12345678901234567", "", 0)]
    #[case("ok", "12345678901234567", 1)]
    #[case("caf\u{e9}", "", 0)]
    #[case("ok", "tab\there", 1)]
    #[case("line\nbreak", "", 0)]
    fn test_invalid_lines(#[case] line1: &str, #[case] line2: &str, #[case] bad_line: usize) {
        let err = DisplayCommand::static_text(line1, line2)
            .validate()
            .unwrap_err();
        match err {
            Error::Validation { line, .. } => assert_eq!(line, bad_line),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_fit_line() {
        assert_eq!(fit_line("  shoe  "), "shoe");
        assert_eq!(fit_line("Caf\u{e9} cups"), "Caf? cups");
        assert_eq!(fit_line("a\tb"), "ab");
        assert_eq!(fit_line("A very long product description"), "A very long prod");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("HELLO", 3), "HEL");
        assert_eq!(truncate_text("HI", 10), "HI");
    }

    proptest! {
        #[test]
        fn prop_fit_line_always_validates(text in ".{0,64}") {
            let command = DisplayCommand::paged(fit_line(&text), fit_line(&text));
            prop_assert!(command.validate().is_ok());
        }
    }
}
