//! Acquisition boundary implemented by platform bindings.

use async_trait::async_trait;
use image::RgbImage;

use crate::constraints::VideoConstraints;
use crate::error::{AcquireError, CaptureError};

/// Source of camera streams.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn acquire(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn MediaStream>, AcquireError>;
}

/// A live camera stream. While live it holds the camera hardware.
pub trait MediaStream: Send {
    /// Native resolution of the video track.
    fn native_size(&self) -> (u32, u32);

    /// The current video frame.
    fn grab_frame(&mut self) -> Result<RgbImage, CaptureError>;

    /// Stop every track of the stream. Idempotent.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Owns a stream and stops it when dropped.
pub struct StreamGuard {
    stream: Box<dyn MediaStream>,
}

impl StreamGuard {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &dyn MediaStream {
        self.stream.as_ref()
    }

    pub fn stream_mut(&mut self) -> &mut dyn MediaStream {
        self.stream.as_mut()
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        if self.stream.is_live() {
            self.stream.stop();
            tracing::debug!("Camera stream released");
        }
    }
}
