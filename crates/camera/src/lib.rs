//! Gate camera capture.
//!
//! The gate form photographs each visitor. This crate holds the capture
//! state machine ([`CameraCapture`]) over an acquisition boundary
//! ([`MediaDevices`] / [`MediaStream`]) that a platform binding implements,
//! plus the encoding and validation of the resulting image data URIs.

pub mod capture;
pub mod constraints;
pub mod device;
pub mod encode;
pub mod error;
pub mod photo;

pub use capture::{CameraCapture, CaptureState};
pub use constraints::{FacingMode, VideoConstraints};
pub use device::{MediaDevices, MediaStream, StreamGuard};
pub use error::{AcquireError, CaptureError};
pub use photo::{PhotoDataUri, PhotoError, PhotoFormat};
