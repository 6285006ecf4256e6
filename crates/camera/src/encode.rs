//! Still-image encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::CaptureError;

/// JPEG quality used for gate photos.
pub const JPEG_QUALITY: u8 = 80;

pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Encode `frame` as a lossy JPEG data URI.
pub fn encode_jpeg_data_uri(frame: &RgbImage, quality: u8) -> Result<String, CaptureError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(CaptureError::EmptyFrame);
    }
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(frame)?;
    Ok(format!("{JPEG_DATA_URI_PREFIX}{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn encodes_jpeg_with_prefix() {
        let frame = RgbImage::from_pixel(8, 6, Rgb([200, 40, 40]));
        let uri = encode_jpeg_data_uri(&frame, JPEG_QUALITY).unwrap();
        assert!(uri.starts_with(JPEG_DATA_URI_PREFIX));

        let bytes = STANDARD
            .decode(&uri[JPEG_DATA_URI_PREFIX.len()..])
            .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "JPEG SOI marker");
    }

    #[test]
    fn empty_frame_rejected() {
        let frame = RgbImage::new(0, 0);
        assert!(matches!(
            encode_jpeg_data_uri(&frame, JPEG_QUALITY),
            Err(CaptureError::EmptyFrame)
        ));
    }
}
