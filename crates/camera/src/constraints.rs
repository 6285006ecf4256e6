//! Video constraint selection.

use std::sync::LazyLock;

use regex::Regex;

/// Desktop ideal resolution.
pub const DESKTOP_IDEAL: (u32, u32) = (640, 480);

/// Mobile ideal resolution.
pub const MOBILE_IDEAL: (u32, u32) = (1280, 720);

static MOBILE_UA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)iPhone|iPad|iPod|Android").expect("valid regex"));

/// Which camera to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Front camera.
    User,
    /// Rear camera.
    Environment,
}

/// Constraints passed to [`MediaDevices::acquire`](crate::MediaDevices::acquire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub ideal_width: Option<u32>,
    pub ideal_height: Option<u32>,
    pub facing: Option<FacingMode>,
}

impl VideoConstraints {
    /// Front camera at a resolution suited to the device class.
    pub fn for_user_agent(user_agent: &str) -> Self {
        let (width, height) = if is_mobile(user_agent) {
            MOBILE_IDEAL
        } else {
            DESKTOP_IDEAL
        };
        Self {
            ideal_width: Some(width),
            ideal_height: Some(height),
            facing: Some(FacingMode::User),
        }
    }

    /// Any video at all; used for the fallback retry.
    pub fn minimal() -> Self {
        Self {
            ideal_width: None,
            ideal_height: None,
            facing: None,
        }
    }

    pub fn is_minimal(&self) -> bool {
        *self == Self::minimal()
    }
}

/// Whether the user agent belongs to a phone or tablet.
pub fn is_mobile(user_agent: &str) -> bool {
    MOBILE_UA.is_match(user_agent)
}
