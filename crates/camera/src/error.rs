/// Why the platform refused to hand over a camera stream.
///
/// Platform bindings map their native error names onto these variants; the
/// capture widget only ever sees this closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquireError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera device found")]
    NoDevice,

    #[error("camera is in use by another application")]
    DeviceBusy,

    #[error("requested video constraints cannot be satisfied")]
    Overconstrained,

    #[error("camera access requires a secure context")]
    InsecureContext,

    #[error("camera error: {0}")]
    Other(String),
}

impl AcquireError {
    /// Stable kind label, e.g. for logs and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::NoDevice => "no-device",
            Self::DeviceBusy => "device-busy",
            Self::Overconstrained => "overconstrained",
            Self::InsecureContext => "insecure-context",
            Self::Other(_) => "other",
        }
    }

    /// Message shown to the guard, telling them how to fix it.
    pub fn remedy(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Camera permission denied. Please allow camera access in your browser settings."
            }
            Self::NoDevice => "No camera found on this device.",
            Self::DeviceBusy => {
                "The camera is being used by another application. Close it and try again."
            }
            Self::Overconstrained => {
                "This camera does not support the requested resolution. Try again with default settings."
            }
            Self::InsecureContext => {
                "Camera access requires a secure (HTTPS) connection. Open the site over HTTPS."
            }
            Self::Other(_) => "Unable to access camera. Please check your device permissions.",
        }
    }
}

/// Failures while turning the live stream into a still.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no live camera stream to capture from")]
    NotStreaming,

    #[error("camera returned an empty frame")]
    EmptyFrame,

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
