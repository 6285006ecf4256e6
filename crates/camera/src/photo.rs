//! Validation of photo data URIs submitted with a visitor entry.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

/// Upper bound on the decoded image size accepted from clients.
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Image types a gate photo may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
    Png,
    Webp,
}

impl PhotoFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo must be a base64 image data URI")]
    NotDataUri,

    #[error("unsupported photo type '{0}'")]
    UnsupportedType(String),

    #[error("photo payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("photo is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("photo content does not match declared type {declared}")]
    Mismatch { declared: &'static str },
}

/// A decoded, type-checked photo.
#[derive(Debug, Clone)]
pub struct PhotoDataUri {
    pub format: PhotoFormat,
    pub bytes: Vec<u8>,
}

impl PhotoDataUri {
    /// Parse `data:<mime>;base64,<payload>` and check the payload really is
    /// an image of the declared type no larger than `max_bytes`.
    pub fn parse(uri: &str, max_bytes: usize) -> Result<Self, PhotoError> {
        let rest = uri.strip_prefix("data:").ok_or(PhotoError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(PhotoError::NotDataUri)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(PhotoError::NotDataUri)?;
        let format = PhotoFormat::from_mime(&mime.to_ascii_lowercase())
            .ok_or_else(|| PhotoError::UnsupportedType(mime.to_string()))?;

        // base64 expands by 4/3; reject early before decoding huge payloads.
        if payload.len() / 4 * 3 > max_bytes + 3 {
            return Err(PhotoError::TooLarge {
                size: payload.len() / 4 * 3,
                max: max_bytes,
            });
        }
        let bytes = STANDARD.decode(payload.trim())?;
        if bytes.len() > max_bytes {
            return Err(PhotoError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        match image::guess_format(&bytes) {
            Ok(actual) if actual == format.image_format() => Ok(Self { format, bytes }),
            _ => Err(PhotoError::Mismatch {
                declared: format.mime(),
            }),
        }
    }

    /// Re-encode as a data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime(), STANDARD.encode(&self.bytes))
    }
}
