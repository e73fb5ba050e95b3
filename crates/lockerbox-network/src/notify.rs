//! Delivery notifications to the owner's chat.
//!
//! The notification API takes a multipart form with the chat identifier, a
//! caption, and the courier photo. It is optional: without a `[notify]` section
//! the sync worker skips notification mutations.

use crate::client::{build_http_client, check_status};
use crate::endpoints;
use crate::error::{ApiError, Result};
use bytes::Bytes;
use chrono::{DateTime, Local};
use lockerbox_core::OpenItem;
use lockerbox_core::config::NotifyConfig;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{instrument, warn};

/// Timestamp layout used in captions.
pub const CAPTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Caption text: description, tracking code and delivery time on separate lines.
pub fn caption(item: &OpenItem, delivered_at: &DateTime<Local>) -> String {
    format!(
        "Package delivered: {}\nTracking code: {}\nAt: {}",
        item.description,
        item.tracking_code,
        delivered_at.format(CAPTION_TIME_FORMAT)
    )
}

/// HTTP client for the chat notification API.
#[derive(Clone)]
pub struct NotifyClient {
    client: Client,
    url: Url,
    chat_id: String,
    timeout: Duration,
}

impl std::fmt::Debug for NotifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL usually embeds the bot token.
        f.debug_struct("NotifyClient")
            .field("url", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl NotifyClient {
    pub fn new(url: &str, chat_id: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| ApiError::ClientBuild(format!("invalid notification URL: {e}")))?;

        Ok(Self {
            client: build_http_client(timeout)?,
            url,
            chat_id: chat_id.into(),
            timeout,
        })
    }

    pub fn from_config(config: &NotifyConfig, timeout: Duration) -> Result<Self> {
        Self::new(&config.url, config.chat_id.clone(), timeout)
    }

    /// Post the delivery caption and photo to the configured chat.
    #[instrument(skip_all, fields(code = %item.tracking_code))]
    pub async fn send_delivery(
        &self,
        item: &OpenItem,
        photo: Bytes,
        delivered_at: &DateTime<Local>,
    ) -> Result<()> {
        let endpoint = &endpoints::NOTIFY_DELIVERY;
        let photo_part = Part::bytes(photo.to_vec())
            .file_name(format!("{}.jpg", item.tracking_code))
            .mime_str("image/jpeg")
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption(item, delivered_at))
            .part("photo", photo_part);

        let url = endpoint.url(&self.url, None)?;
        let response = self
            .client
            .request(endpoint.method.clone(), url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Notification request failed");
                ApiError::from_reqwest(e, self.timeout.as_millis() as u64)
            })?;

        check_status(endpoint, response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lockerbox_core::TrackingCode;

    #[test]
    fn test_caption_contains_item_and_time() {
        let item = OpenItem::new(TrackingCode::new("5555").unwrap(), "shoe", "2024-02-25");
        let at = Local.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();

        let text = caption(&item, &at);
        assert!(text.contains("shoe"));
        assert!(text.contains("5555"));
        assert!(text.contains("2024-03-01 14:05:09"));
    }

    #[test]
    fn test_debug_redacts_url() {
        let client = NotifyClient::new(
            "https://api.example/botSECRET/sendPhoto",
            "42",
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{client:?}").contains("SECRET"));
    }
}
