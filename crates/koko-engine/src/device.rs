//! # Device Seams
//!
//! Trait seams for the two genuinely asynchronous collaborators: the camera
//! and the barcode decoder.
//!
//! ## Resource Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Camera Resource Lifecycle                           │
//! │                                                                         │
//! │  enter CameraActive ──► device.open().await                            │
//! │       │                     │                                           │
//! │       │                     ├── Ok(stream) ──► stream held by engine   │
//! │       │                     └── Err(e) ──────► notify + back to Idle   │
//! │       ▼                                                                 │
//! │  leave CameraActive (close / capture / cancel / visibility loss)       │
//! │       │                                                                 │
//! │       └──► release path: take the stream, stop it                      │
//! │            • idempotent: stopping twice is fine                        │
//! │            • safe with no stream held (never panics)                   │
//! │                                                                         │
//! │  ALL exits route through the SAME release path. A second path would    │
//! │  eventually leak a device handle.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decoder follows the same shape: `start()` yields a handle, the handle
//! is stopped on every exit from `BarcodeScanning`. Decoded codes reach the
//! engine through [`ScanEngine::decode_barcode`], not through the handle.
//!
//! [`ScanEngine::decode_barcode`]: crate::session::ScanEngine::decode_barcode

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Device Error
// =============================================================================

/// Failures at the resource-acquisition boundary.
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    /// The user or platform denied access to the device.
    #[error("Permission denied for {device}")]
    PermissionDenied { device: String },

    /// No suitable device is present.
    #[error("No {device} available")]
    NotAvailable { device: String },

    /// The device failed after acquisition.
    #[error("{device} failed: {reason}")]
    Failed { device: String, reason: String },
}

// =============================================================================
// Camera
// =============================================================================

/// A live camera stream held while the session is in `CameraActive`.
///
/// `stop` must be idempotent: the engine calls it through a single release
/// path that may run redundantly (close, cancel, drop-on-teardown).
pub trait CameraStream: Send {
    fn stop(&mut self);
}

/// The camera acquisition seam.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Acquires a camera stream.
    ///
    /// Failures are reported as values; the engine turns them into an error
    /// notification and returns the session to `Idle`.
    async fn open(&self) -> Result<Box<dyn CameraStream>, DeviceError>;
}

// =============================================================================
// Barcode Decoder
// =============================================================================

/// A running decoder session held while in `BarcodeScanning`.
///
/// Same idempotency contract as [`CameraStream::stop`].
pub trait DecoderHandle: Send {
    fn stop(&mut self);
}

/// The decoder acquisition seam.
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    /// Starts the decoder.
    async fn start(&self) -> Result<Box<dyn DecoderHandle>, DeviceError>;
}

// =============================================================================
// Demo Implementations
// =============================================================================

/// In-process camera stand-in: acquisition always succeeds, `stop` counts.
///
/// Used by the kiosk demo and the engine tests.
#[derive(Debug, Default)]
pub struct DemoCamera;

struct DemoCameraStream {
    stopped: bool,
}

impl CameraStream for DemoCameraStream {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            debug!("demo camera stream stopped");
        }
    }
}

#[async_trait]
impl CameraDevice for DemoCamera {
    async fn open(&self) -> Result<Box<dyn CameraStream>, DeviceError> {
        debug!("demo camera stream opened");
        Ok(Box::new(DemoCameraStream { stopped: false }))
    }
}

/// In-process decoder stand-in.
#[derive(Debug, Default)]
pub struct DemoDecoder;

struct DemoDecoderHandle {
    stopped: bool,
}

impl DecoderHandle for DemoDecoderHandle {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            debug!("demo decoder stopped");
        }
    }
}

#[async_trait]
impl BarcodeDecoder for DemoDecoder {
    async fn start(&self) -> Result<Box<dyn DecoderHandle>, DeviceError> {
        debug!("demo decoder started");
        Ok(Box::new(DemoDecoderHandle { stopped: false }))
    }
}

/// A camera that always fails to open, for exercising the resource-error
/// path in tests.
#[derive(Debug)]
pub struct UnavailableCamera;

#[async_trait]
impl CameraDevice for UnavailableCamera {
    async fn open(&self) -> Result<Box<dyn CameraStream>, DeviceError> {
        Err(DeviceError::PermissionDenied {
            device: "camera".to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_camera_opens_and_stops_idempotently() {
        let camera = DemoCamera;
        let mut stream = camera.open().await.unwrap();
        stream.stop();
        stream.stop(); // second stop is a no-op, not a panic
    }

    #[tokio::test]
    async fn test_unavailable_camera_reports_permission_denied() {
        let camera = UnavailableCamera;
        let err = camera.open().await.err().unwrap();
        assert!(matches!(err, DeviceError::PermissionDenied { .. }));
        assert_eq!(err.to_string(), "Permission denied for camera");
    }

    #[tokio::test]
    async fn test_demo_decoder_round_trip() {
        let decoder = DemoDecoder;
        let mut handle = decoder.start().await.unwrap();
        handle.stop();
        handle.stop();
    }
}
