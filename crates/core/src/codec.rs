//! Image and base64 codecs shared by both services.

use std::io::Cursor;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::DetectionError;

/// JPEG quality for annotated images returned by the Detection API.
pub const RESPONSE_JPEG_QUALITY: u8 = 95;

/// JPEG quality for frames written by the ingest service.
pub const FRAME_JPEG_QUALITY: u8 = 75;

/// Standard alphabet, accepting input with or without padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode an encoded raster image (JPEG, PNG, WebP) into 8-bit RGB.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, DetectionError> {
    let img = image::load_from_memory(bytes).map_err(|e| DetectionError::Decode(e.to_string()))?;
    Ok(img.to_rgb8())
}

/// Encode an RGB image as JPEG.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    image.write_with_encoder(encoder)?;
    Ok(out.into_inner())
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64, ignoring ASCII whitespace and missing padding.
pub fn from_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if text.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        LENIENT.decode(compact)
    } else {
        LENIENT.decode(text)
    }
}
