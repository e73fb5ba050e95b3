//! Mock camera writing placeholder JPEG files.
//!
//! Each capture produces a small file in the configured photo directory so the
//! rest of the pipeline (multipart upload, local cleanup) sees real files.

use crate::{HardwareError, Result, traits::CameraDevice, types::DeviceInfo, types::PhotoRef};
use bytes::{BufMut, BytesMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// JPEG start-of-image and end-of-image markers.
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Mock camera device.
#[derive(Debug)]
pub struct MockCamera {
    photo_dir: PathBuf,
    captures: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MockCamera {
    /// Create a camera storing photos under `photo_dir`.
    ///
    /// The directory is created on first capture.
    pub fn new(photo_dir: impl Into<PathBuf>) -> (Self, MockCameraHandle) {
        let photo_dir = photo_dir.into();
        let captures = Arc::new(AtomicUsize::new(0));
        let failing = Arc::new(AtomicBool::new(false));

        let camera = Self {
            photo_dir: photo_dir.clone(),
            captures: Arc::clone(&captures),
            failing: Arc::clone(&failing),
        };
        let handle = MockCameraHandle {
            photo_dir,
            captures,
            failing,
        };

        (camera, handle)
    }

    fn placeholder_image(sequence: usize) -> BytesMut {
        let mut image = BytesMut::with_capacity(16);
        image.put_slice(&JPEG_SOI);
        image.put_u64(sequence as u64);
        image.put_slice(&JPEG_EOI);
        image
    }
}

impl CameraDevice for MockCamera {
    async fn capture(&mut self) -> Result<PhotoRef> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::capture("camera returned no frame"));
        }

        let sequence = self.captures.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.photo_dir.join(format!("photo-{sequence:04}.jpg"));
        let image = Self::placeholder_image(sequence).freeze();

        tokio::fs::create_dir_all(&self.photo_dir).await?;
        tokio::fs::write(&path, &image).await?;

        tracing::debug!(path = %path.display(), bytes = image.len(), "Mock photo captured");
        Ok(PhotoRef::new(path, image))
    }

    async fn delete(&mut self, photo: &PhotoRef) -> Result<()> {
        match tokio::fs::remove_file(photo.path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock Camera", "Mock Still Camera v1.0"))
    }
}

/// Handle for inspecting and disturbing a [`MockCamera`].
#[derive(Debug, Clone)]
pub struct MockCameraHandle {
    photo_dir: PathBuf,
    captures: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MockCameraHandle {
    /// Number of successful captures so far.
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn photo_dir(&self) -> &std::path::Path {
        &self.photo_dir
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capture_writes_jpeg_file() {
        let dir = tempfile::tempdir().unwrap();
        let (mut camera, handle) = MockCamera::new(dir.path().join("photos"));

        let photo = camera.capture().await.unwrap();

        assert!(photo.path().exists());
        assert_eq!(&photo.bytes()[..2], &JPEG_SOI);
        assert_eq!(&photo.bytes()[photo.bytes().len() - 2..], &JPEG_EOI);
        assert_eq!(handle.capture_count(), 1);

        let on_disk = std::fs::read(photo.path()).unwrap();
        assert_eq!(on_disk, photo.bytes().to_vec());
    }

    #[tokio::test]
    async fn test_captures_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let (mut camera, _handle) = MockCamera::new(dir.path());

        let first = camera.capture().await.unwrap();
        let second = camera.capture().await.unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (mut camera, _handle) = MockCamera::new(dir.path());

        let photo = camera.capture().await.unwrap();
        camera.delete(&photo).await.unwrap();
        assert!(!photo.path().exists());
        camera.delete(&photo).await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let dir = tempfile::tempdir().unwrap();
        let (mut camera, handle) = MockCamera::new(dir.path());
        handle.set_failing(true);

        let err = camera.capture().await.unwrap_err();
        assert!(matches!(err, HardwareError::CaptureError { .. }));
        assert_eq!(handle.capture_count(), 0);
    }
}
