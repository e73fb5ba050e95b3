//! Kiosk configuration.
//!
//! Configuration is read once at startup from a TOML file. Every section except
//! `[server]` and `[kiosk]` is optional and falls back to the defaults in
//! [`constants`](crate::constants). Secrets are redacted in `Debug` output.
//!
//! ```toml
//! [server]
//! base_url = "https://inventory.example.com"
//! token = "secret"
//!
//! [notify]
//! url = "https://chat.example.com/bot123/sendPhoto"
//! chat_id = "42"
//!
//! [kiosk]
//! universal_password = "0000"
//!
//! [timing]
//! door_timeout_secs = 15
//!
//! [scale]
//! weight_offset = 1.0
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::constants::*;
use crate::types::UniversalPassword;
use crate::{Error, Result};

/// Complete kiosk configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KioskConfig {
    pub server: ServerConfig,

    #[serde(default)]
    pub notify: Option<NotifyConfig>,

    pub kiosk: KioskSection,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub scale: ScaleConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub queues: QueueConfig,
}

/// Inventory server connection.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL, e.g. `https://inventory.example.com`.
    pub base_url: String,

    /// Bearer token sent with every mutating request.
    pub token: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Chat notification endpoint. The URL usually embeds the bot token.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    pub url: String,
    pub chat_id: String,
}

impl fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("url", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KioskSection {
    pub universal_password: UniversalPassword,
}

/// Controller, poller and network timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub keypad_timeout_secs: u64,
    pub door_timeout_secs: u64,
    pub reminder_interval_secs: u64,
    pub message_hold_ms: u64,
    pub page_dwell_ms: u64,
    pub poll_interval_secs: u64,
    pub network_timeout_secs: u64,
    pub tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            keypad_timeout_secs: DEFAULT_KEYPAD_TIMEOUT_SECS,
            door_timeout_secs: DEFAULT_DOOR_TIMEOUT_SECS,
            reminder_interval_secs: DEFAULT_REMINDER_INTERVAL_SECS,
            message_hold_ms: DEFAULT_MESSAGE_HOLD_MS,
            page_dwell_ms: DEFAULT_PAGE_DWELL_MS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            network_timeout_secs: DEFAULT_NETWORK_TIMEOUT_SECS,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl TimingConfig {
    pub fn keypad_timeout(&self) -> Duration {
        Duration::from_secs(self.keypad_timeout_secs)
    }

    pub fn door_timeout(&self) -> Duration {
        Duration::from_secs(self.door_timeout_secs)
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs)
    }

    pub fn message_hold(&self) -> Duration {
        Duration::from_millis(self.message_hold_ms)
    }

    pub fn page_dwell(&self) -> Duration {
        Duration::from_millis(self.page_dwell_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleConfig {
    /// Guard band (kg) above the baseline a deposit must exceed.
    pub weight_offset: f64,

    /// Raw samples averaged per reading.
    pub samples: usize,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            weight_offset: DEFAULT_WEIGHT_OFFSET,
            samples: DEFAULT_WEIGHT_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Directory captured photos are written to before upload.
    pub photo_dir: PathBuf,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            photo_dir: std::env::temp_dir().join("lockerbox-photos"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl KioskConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, `Error::ConfigParse` if it
    /// is not valid TOML for this schema, and `Error::Config` if a value is out
    /// of range. All of these are fatal at startup.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            warn!("Failed to read config at {:?}: {}", path, e);
            e
        })?;

        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: KioskConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the schema alone cannot express.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.server.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "server.base_url must be an http(s) URL, got '{base_url}'"
            )));
        }

        if self.server.token.trim().is_empty() {
            return Err(Error::config("server.token must not be empty"));
        }

        if let Some(notify) = &self.notify {
            if !(notify.url.starts_with("http://") || notify.url.starts_with("https://")) {
                return Err(Error::config("notify.url must be an http(s) URL"));
            }
            if notify.chat_id.trim().is_empty() {
                return Err(Error::config("notify.chat_id must not be empty"));
            }
        }

        let timing = &self.timing;
        for (name, value) in [
            ("timing.keypad_timeout_secs", timing.keypad_timeout_secs),
            ("timing.door_timeout_secs", timing.door_timeout_secs),
            ("timing.reminder_interval_secs", timing.reminder_interval_secs),
            ("timing.poll_interval_secs", timing.poll_interval_secs),
            ("timing.network_timeout_secs", timing.network_timeout_secs),
            ("timing.tick_ms", timing.tick_ms),
        ] {
            if value == 0 {
                return Err(Error::config(format!("{name} must be greater than 0")));
            }
        }

        if !self.scale.weight_offset.is_finite() || self.scale.weight_offset < 0.0 {
            return Err(Error::config(format!(
                "scale.weight_offset must be a non-negative number, got {}",
                self.scale.weight_offset
            )));
        }

        if self.scale.samples == 0 {
            return Err(Error::config("scale.samples must be at least 1"));
        }

        if self.queues.capacity == 0 {
            return Err(Error::config("queues.capacity must be at least 1"));
        }

        let password_len = self.kiosk.universal_password.len();
        if password_len < TRACKING_CODE_LENGTH {
            warn!(
                password_len,
                "Universal password is shorter than a tracking code and cannot be entered on the keypad"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        [server]
        base_url = "http://localhost:8000"
        token = "secret-token"

        [kiosk]
        universal_password = "0000"
    "#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = KioskConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert!(config.notify.is_none());
        assert!(config.kiosk.universal_password.matches("0000"));
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.timing.door_timeout(), Duration::from_secs(15));
        assert_eq!(config.timing.keypad_timeout(), Duration::from_secs(15));
        assert_eq!(config.timing.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.scale.weight_offset, DEFAULT_WEIGHT_OFFSET);
        assert_eq!(config.queues.capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            [server]
            base_url = "https://inventory.example.com"
            token = "t"

            [notify]
            url = "https://chat.example.com/bot1/sendPhoto"
            chat_id = "42"

            [kiosk]
            universal_password = "A1"

            [timing]
            keypad_timeout_secs = 20
            door_timeout_secs = 30
            tick_ms = 10

            [scale]
            weight_offset = 0.5
            samples = 3

            [camera]
            photo_dir = "/var/lib/lockerbox/photos"

            [queues]
            capacity = 4
        "#;

        let config = KioskConfig::from_toml_str(text).unwrap();
        assert_eq!(config.notify.as_ref().unwrap().chat_id, "42");
        assert_eq!(config.timing.keypad_timeout_secs, 20);
        assert_eq!(config.timing.door_timeout_secs, 30);
        assert_eq!(config.timing.reminder_interval_secs, DEFAULT_REMINDER_INTERVAL_SECS);
        assert_eq!(config.scale.samples, 3);
        assert_eq!(config.camera.photo_dir, PathBuf::from("/var/lib/lockerbox/photos"));
        assert_eq!(config.queues.capacity, 4);
    }

    #[test]
    fn test_oversized_password_is_fatal() {
        let text = MINIMAL.replace("\"0000\"", "\"12345\"");
        let error = KioskConfig::from_toml_str(&text).unwrap_err();

        assert!(error.is_fatal());
        assert!(error.to_string().contains("universal password"));
    }

    #[test]
    fn test_short_password_is_accepted() {
        let text = MINIMAL.replace("\"0000\"", "\"12\"");
        let config = KioskConfig::from_toml_str(&text).unwrap();

        assert_eq!(config.kiosk.universal_password.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_section_is_fatal() {
        let text = r#"
            [kiosk]
            universal_password = "0000"
        "#;
        let error = KioskConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(error, Error::ConfigParse(_)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let text = format!("{MINIMAL}\n[scale]\nweight_ofset = 2.0\n");
        assert!(KioskConfig::from_toml_str(&text).is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cases = [
            MINIMAL.replace("http://localhost:8000", "localhost:8000"),
            MINIMAL.replace("secret-token", "  "),
            format!("{MINIMAL}\n[timing]\ndoor_timeout_secs = 0\n"),
            format!("{MINIMAL}\n[scale]\nweight_offset = -1.0\n"),
            format!("{MINIMAL}\n[scale]\nsamples = 0\n"),
            format!("{MINIMAL}\n[queues]\ncapacity = 0\n"),
        ];

        for text in cases {
            let error = KioskConfig::from_toml_str(&text).unwrap_err();
            assert!(matches!(error, Error::Config(_)), "unexpected: {error}");
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let text = format!(
            "{MINIMAL}\n[notify]\nurl = \"https://chat.example.com/botSECRET/sendPhoto\"\nchat_id = \"1\"\n"
        );
        let config = KioskConfig::from_toml_str(&text).unwrap();
        let debug = format!("{config:?}");

        assert!(!debug.contains("secret-token"));
        assert!(!debug.contains("botSECRET"));
        assert!(!debug.contains("0000"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = KioskConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.token, "secret-token");
    }

    #[test]
    fn test_from_missing_file() {
        let error = KioskConfig::from_file("/nonexistent/lockerbox.toml").unwrap_err();
        assert!(matches!(error, Error::Io(_)));
    }
}
