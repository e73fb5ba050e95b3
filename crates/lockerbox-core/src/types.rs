use crate::{
    Result,
    constants::{MAX_PASSWORD_LENGTH, TRACKING_CODE_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use subtle::ConstantTimeEq;

/// Returns `true` for characters a matrix keypad or the server may use in a code.
fn is_code_char(c: char) -> bool {
    c.is_ascii_graphic()
}

/// Tracking code of an open item (exactly 4 printable ASCII characters).
///
/// This is the key a courier types on the keypad. Equality is exact: no trimming
/// or case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingCode(String);

impl TrackingCode {
    /// Create a new tracking code with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidTrackingCode` if the code is not exactly
    /// 4 printable ASCII characters.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();

        let len = code.chars().count();
        if len != TRACKING_CODE_LENGTH {
            return Err(Error::InvalidTrackingCode(format!(
                "expected {TRACKING_CODE_LENGTH} characters, got {len}"
            )));
        }

        if !code.chars().all(is_code_char) {
            return Err(Error::InvalidTrackingCode(format!(
                "'{code}' contains non-printable characters"
            )));
        }

        Ok(TrackingCode(code))
    }

    /// Get the tracking code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TrackingCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TrackingCode::new(s)
    }
}

impl TryFrom<String> for TrackingCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        TrackingCode::new(value)
    }
}

impl From<TrackingCode> for String {
    fn from(code: TrackingCode) -> Self {
        code.0
    }
}

impl Borrow<str> for TrackingCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An item the server considers open (awaiting drop-off or pickup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItem {
    pub tracking_code: TrackingCode,
    pub description: String,
    pub order_date: String,
}

impl OpenItem {
    pub fn new(
        tracking_code: TrackingCode,
        description: impl Into<String>,
        order_date: impl Into<String>,
    ) -> Self {
        Self {
            tracking_code,
            description: description.into(),
            order_date: order_date.into(),
        }
    }
}

/// All open items as last reported by the server, keyed by tracking code.
///
/// Snapshots are replaced wholesale and compared by value; the poller only
/// publishes a snapshot that differs from the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    items: BTreeMap<TrackingCode, OpenItem>,
}

impl InventorySnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a list of items.
    ///
    /// When the same code appears twice the later record wins.
    pub fn from_items(items: impl IntoIterator<Item = OpenItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.tracking_code.clone(), item))
            .collect();
        Self { items }
    }

    /// Look up an item by the raw keypad buffer.
    pub fn get(&self, code: &str) -> Option<&OpenItem> {
        self.items.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.items.contains_key(code)
    }

    /// Remove an item, returning it if it was present.
    pub fn remove(&mut self, code: &str) -> Option<OpenItem> {
        self.items.remove(code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the tracking codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &TrackingCode> {
        self.items.keys()
    }

    pub fn items(&self) -> impl Iterator<Item = &OpenItem> {
        self.items.values()
    }
}

impl FromIterator<OpenItem> for InventorySnapshot {
    fn from_iter<I: IntoIterator<Item = OpenItem>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

/// Owner password that opens the box without a tracking code (1-4 characters).
///
/// # Security
/// Comparison is constant-time and the value is redacted from `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct UniversalPassword(String);

impl UniversalPassword {
    /// Create a new universal password with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidPassword` if the password is empty, longer than
    /// 4 characters, or contains non-printable characters.
    pub fn new(password: impl Into<String>) -> Result<Self> {
        let password = password.into();

        let len = password.chars().count();
        if len == 0 || len > MAX_PASSWORD_LENGTH {
            return Err(Error::InvalidPassword(format!(
                "length must be 1-{MAX_PASSWORD_LENGTH} characters, got {len}"
            )));
        }

        if !password.chars().all(is_code_char) {
            return Err(Error::InvalidPassword(
                "password must be printable ASCII".to_string(),
            ));
        }

        Ok(UniversalPassword(password))
    }

    /// Check a keypad buffer against the password in constant time.
    pub fn matches(&self, input: &str) -> bool {
        self.0.as_bytes().ct_eq(input.as_bytes()).into()
    }

    /// Number of characters in the password.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Always `false`; construction rejects empty passwords.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for UniversalPassword {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        UniversalPassword::new(value)
    }
}

impl fmt::Debug for UniversalPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UniversalPassword([REDACTED])")
    }
}
