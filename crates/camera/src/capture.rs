//! Capture state machine for the gate camera widget.
//!
//! ```text
//! Idle ──start──▶ Streaming ──capture──▶ Captured ──confirm──▶ (image)
//!   │                │                      │
//!   └──── fail ──▶ Error          retake ◀──┘
//! ```
//!
//! The stream is owned by a [`StreamGuard`], so it is stopped on capture,
//! cancel, or whenever the widget is dropped.

use std::time::Duration;

use image::{imageops, RgbImage};

use crate::constraints::VideoConstraints;
use crate::device::{MediaDevices, StreamGuard};
use crate::encode::{encode_jpeg_data_uri, JPEG_QUALITY};
use crate::error::{AcquireError, CaptureError};

/// Pause before retrying an overconstrained request with minimal constraints.
pub const OVERCONSTRAINED_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Observable widget state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Streaming,
    Captured,
    Error(AcquireError),
}

enum Stage {
    Idle,
    Streaming(StreamGuard),
    Captured(String),
    Error(AcquireError),
}

pub struct CameraCapture<D> {
    devices: D,
    constraints: VideoConstraints,
    retry_delay: Duration,
    stage: Stage,
}

impl<D: MediaDevices> CameraCapture<D> {
    pub fn new(devices: D, user_agent: &str) -> Self {
        Self {
            devices,
            constraints: VideoConstraints::for_user_agent(user_agent),
            retry_delay: OVERCONSTRAINED_RETRY_DELAY,
            stage: Stage::Idle,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn constraints(&self) -> &VideoConstraints {
        &self.constraints
    }

    pub fn state(&self) -> CaptureState {
        match &self.stage {
            Stage::Idle => CaptureState::Idle,
            Stage::Streaming(_) => CaptureState::Streaming,
            Stage::Captured(_) => CaptureState::Captured,
            Stage::Error(e) => CaptureState::Error(e.clone()),
        }
    }

    /// The captured still, if any.
    pub fn still(&self) -> Option<&str> {
        match &self.stage {
            Stage::Captured(uri) => Some(uri),
            _ => None,
        }
    }

    /// Acquire the camera. An overconstrained first attempt is retried once
    /// with [`VideoConstraints::minimal`].
    pub async fn start(&mut self) -> Result<(), AcquireError> {
        if matches!(self.stage, Stage::Streaming(_)) {
            return Ok(());
        }
        self.stage = Stage::Idle;

        let acquired = match self.devices.acquire(&self.constraints).await {
            Err(AcquireError::Overconstrained) => {
                tracing::warn!(
                    delay_ms = self.retry_delay.as_millis() as u64,
                    "Camera overconstrained, retrying with minimal constraints",
                );
                tokio::time::sleep(self.retry_delay).await;
                self.devices.acquire(&VideoConstraints::minimal()).await
            }
            other => other,
        };

        match acquired {
            Ok(stream) => {
                let guard = StreamGuard::new(stream);
                let (width, height) = guard.stream().native_size();
                tracing::debug!(width, height, "Camera stream started");
                self.stage = Stage::Streaming(guard);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Camera unavailable");
                self.stage = Stage::Error(e.clone());
                Err(e)
            }
        }
    }

    /// Grab the current frame, encode it and release the camera.
    pub fn capture(&mut self) -> Result<&str, CaptureError> {
        let Stage::Streaming(guard) = &mut self.stage else {
            return Err(CaptureError::NotStreaming);
        };
        let (width, height) = guard.stream().native_size();
        let frame = guard.stream_mut().grab_frame()?;

        let mut canvas = RgbImage::new(width, height);
        imageops::replace(&mut canvas, &frame, 0, 0);
        let uri = encode_jpeg_data_uri(&canvas, JPEG_QUALITY)?;

        // Replacing the stage drops the guard, which stops the stream.
        self.stage = Stage::Captured(uri);
        match &self.stage {
            Stage::Captured(uri) => Ok(uri),
            _ => unreachable!("stage was just set to Captured"),
        }
    }

    /// Discard the still and go back to streaming.
    pub async fn retake(&mut self) -> Result<(), AcquireError> {
        self.stage = Stage::Idle;
        self.start().await
    }

    /// Hand the still to the caller.
    pub fn confirm(self) -> Option<String> {
        match self.stage {
            Stage::Captured(uri) => Some(uri),
            _ => None,
        }
    }

    /// Close without producing an image.
    pub fn cancel(self) {
        tracing::debug!("Camera capture cancelled");
    }

    /// Release the camera and return to idle.
    pub fn stop(&mut self) {
        self.stage = Stage::Idle;
    }
}
