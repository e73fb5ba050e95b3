//! HTTP client for the inventory API.
//!
//! The inventory server owns the list of open items. The kiosk reads that list
//! (unauthenticated `GET`) and reports two kinds of changes, both authenticated
//! with a bearer token: an item is no longer open (`DELETE`), and a delivery
//! happened, with the courier photo attached (multipart `POST`).
//!
//! # Design Principles
//!
//! - **No automatic retry**: callers decide; the sync worker never retries
//! - **Bounded**: every request carries the configured timeout
//! - **Stateless**: the client can be cloned freely between tasks
//!
//! # Example
//!
//! ```no_run
//! use lockerbox_network::InventoryClient;
//! use std::time::Duration;
//!
//! # async fn example() -> lockerbox_network::Result<()> {
//! let client = InventoryClient::new("http://127.0.0.1:8000", "secret", Duration::from_secs(10))?;
//! for record in client.list_open_items().await? {
//!     println!("{} {}", record.tracking_code, record.description);
//! }
//! # Ok(())
//! # }
//! ```

use crate::endpoints::{self, Endpoint, status_message};
use crate::error::{ApiError, Result};
use bytes::Bytes;
use lockerbox_core::{KioskConfig, OpenItem, TrackingCode};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// An open item as it appears on the wire.
///
/// Tracking codes are not validated here; the poller converts each record with
/// [`into_item`](Self::into_item) and skips the ones that fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItemRecord {
    pub tracking_code: String,
    pub description: String,
    pub order_date: String,
}

impl OpenItemRecord {
    /// Validate the tracking code and build a domain item.
    pub fn into_item(self) -> lockerbox_core::Result<OpenItem> {
        let code = TrackingCode::new(self.tracking_code)?;
        Ok(OpenItem::new(code, self.description, self.order_date))
    }
}

impl From<&OpenItem> for OpenItemRecord {
    fn from(item: &OpenItem) -> Self {
        Self {
            tracking_code: item.tracking_code.to_string(),
            description: item.description.clone(),
            order_date: item.order_date.clone(),
        }
    }
}

/// Build a `reqwest` client with the kiosk's request timeout.
pub(crate) fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to build HTTP client");
            ApiError::ClientBuild(e.to_string())
        })
}

/// Map a non-success response to [`ApiError::Status`].
pub(crate) fn check_status(endpoint: &Endpoint, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let message = status_message(code).into_owned();
    warn!(endpoint = endpoint.name, status = code, message = %message, "Server rejected request");
    Err(ApiError::Status {
        endpoint: endpoint.name,
        code,
        message,
    })
}

/// HTTP client for the inventory API.
#[derive(Clone)]
pub struct InventoryClient {
    client: Client,
    base_url: Url,
    token: String,
    timeout: Duration,
}

impl std::fmt::Debug for InventoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl InventoryClient {
    /// Create a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ClientBuild` if the base URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::ClientBuild(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
            token: token.into(),
            timeout,
        })
    }

    /// Create a client from the `[server]` and `[timing]` sections.
    pub fn from_config(config: &KioskConfig) -> Result<Self> {
        Self::new(
            &config.server.base_url,
            config.server.token.clone(),
            config.timing.network_timeout(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    fn request(&self, endpoint: &Endpoint, code: Option<&str>) -> Result<reqwest::RequestBuilder> {
        let url = endpoint.url(&self.base_url, code)?;
        let mut request = self.client.request(endpoint.method.clone(), url);
        if endpoint.authenticated {
            request = request.bearer_auth(&self.token);
        }
        Ok(request)
    }

    async fn send(&self, endpoint: &Endpoint, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint = endpoint.name, error = %e, "Request failed");
            ApiError::from_reqwest(e, self.timeout_ms())
        })?;
        check_status(endpoint, response)
    }

    /// Fetch every open item.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses and malformed JSON are all errors;
    /// individual records with bad tracking codes are not (see
    /// [`OpenItemRecord::into_item`]).
    #[instrument(skip(self))]
    pub async fn list_open_items(&self) -> Result<Vec<OpenItemRecord>> {
        let endpoint = &endpoints::LIST_ITEMS;
        let response = self.send(endpoint, self.request(endpoint, None)?).await?;

        let records: Vec<OpenItemRecord> = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse open item list");
            ApiError::Decode(e.to_string())
        })?;

        debug!(count = records.len(), "Fetched open items");
        Ok(records)
    }

    /// Remove an item from the open-item registry.
    #[instrument(skip(self, code), fields(code = %code))]
    pub async fn delete_item(&self, code: &TrackingCode) -> Result<()> {
        let endpoint = &endpoints::DELETE_ITEM;
        let request = self.request(endpoint, Some(code.as_str()))?;
        self.send(endpoint, request).await?;
        Ok(())
    }

    /// Record a successful deposit with the courier photo.
    ///
    /// Returns the record the server echoes back, if it sent one.
    #[instrument(skip(self, item, photo), fields(code = %item.tracking_code, photo_bytes = photo.len()))]
    pub async fn register_success(
        &self,
        item: &OpenItem,
        photo: Bytes,
    ) -> Result<Option<OpenItemRecord>> {
        let endpoint = &endpoints::REGISTER_SUCCESS;

        let photo_part = Part::bytes(photo.to_vec())
            .file_name(format!("{}.jpg", item.tracking_code))
            .mime_str("image/jpeg")
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let form = Form::new()
            .text("tracking_code", item.tracking_code.to_string())
            .text("description", item.description.clone())
            .text("order_date", item.order_date.clone())
            .part("photo", photo_part);

        let request = self.request(endpoint, None)?.multipart(form);
        let response = self.send(endpoint, request).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_ms()))?;
        if body.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice::<OpenItemRecord>(&body) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                debug!(error = %e, "Delivery response carried no item record");
                Ok(None)
            }
        }
    }
}
