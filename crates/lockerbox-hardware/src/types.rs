//! Common types shared across peripheral implementations.
//!
//! This module defines the values that flow between the kiosk controller and
//! its devices: device metadata, the catalogue of voice prompts, and the handle
//! to a captured courier photo.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Generic device information.
///
/// Reported by every peripheral and logged once when the kiosk starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "HX711 Load Cell", "Mock Door").
    pub name: String,

    /// Device model identifier.
    pub model: String,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.model)
    }
}

/// Recorded voice prompts the kiosk can play.
///
/// Playback is fire-and-forget; the controller never waits for a clip to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    /// Owner password accepted, door unlocked.
    OwnerOpen,

    /// Ask the courier to face the camera.
    PoseForPhoto,

    /// Camera shutter.
    Shutter,

    /// Ask the courier to place the package and close the door.
    PlaceItem,

    /// Door has been left open too long.
    CloseDoor,

    /// Package accepted.
    Accepted,

    /// Package rejected (weight did not increase).
    Rejected,
}

impl SoundId {
    /// Every prompt, in catalogue order.
    pub const ALL: [SoundId; 7] = [
        SoundId::OwnerOpen,
        SoundId::PoseForPhoto,
        SoundId::Shutter,
        SoundId::PlaceItem,
        SoundId::CloseDoor,
        SoundId::Accepted,
        SoundId::Rejected,
    ];

    /// Audio asset file name for this prompt.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::OwnerOpen => "owner_open.wav",
            Self::PoseForPhoto => "pose_for_photo.wav",
            Self::Shutter => "shutter.wav",
            Self::PlaceItem => "place_item.wav",
            Self::CloseDoor => "close_door.wav",
            Self::Accepted => "accepted.wav",
            Self::Rejected => "rejected.wav",
        }
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.file_name();
        f.write_str(name.strip_suffix(".wav").unwrap_or(name))
    }
}

/// A captured photo: where it lives on disk and its encoded bytes.
///
/// The bytes are reference-counted, so cloning a `PhotoRef` to hand it to the
/// outbound queue does not copy the image.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoRef {
    path: PathBuf,
    bytes: Bytes,
}

impl PhotoRef {
    pub fn new(path: impl Into<PathBuf>, bytes: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    /// Local file backing this photo.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoded image bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

impl fmt::Debug for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoRef")
            .field("path", &self.path)
            .field("len", &self.bytes.len())
            .finish()
    }
}
