//! Error types shared by every lockerbox crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Domain value errors
    #[error("Invalid tracking code: {0}")]
    InvalidTrackingCode(String),

    #[error("Invalid universal password: {0}")]
    InvalidPassword(String),

    // Display contract errors
    #[error("Display validation failed on line {line}: {reason}")]
    Validation { line: usize, reason: String },

    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Create a display validation error for the given line (0-based).
    pub fn validation(line: usize, reason: impl Into<String>) -> Self {
        Self::Validation {
            line,
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` for errors that must stop the process at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::ConfigParse(_) | Self::InvalidPassword(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = Error::validation(1, "line exceeds 16 columns");
        assert_eq!(
            error.to_string(),
            "Display validation failed on line 1: line exceeds 16 columns"
        );
    }

    #[test]
    fn test_config_errors_are_fatal() {
        assert!(Error::config("missing token").is_fatal());
        assert!(Error::InvalidPassword("too long".into()).is_fatal());
        assert!(!Error::InvalidTrackingCode("12".into()).is_fatal());
        assert!(!Error::validation(0, "non-ascii").is_fatal());
    }
}
