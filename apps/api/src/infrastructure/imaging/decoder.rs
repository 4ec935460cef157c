//! Turns the `image` field of a submission into an in-memory bitmap.

use crate::domain::drawing::errors::DrawingError;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::DynamicImage;

/// Returns everything after the first comma of a data URI, or the whole
/// string when there is no `<scheme>,` prefix.
pub fn extract_base64_payload(image: &str) -> &str {
    match image.split_once(',') {
        Some((_, rest)) => rest,
        None => image,
    }
}

/// Decodes a data URI or raw base64 string into bytes.
///
/// ASCII whitespace inside the payload (line-wrapped base64) is ignored.
pub fn decode_payload(image: &str) -> Result<Vec<u8>, DrawingError> {
    let payload = extract_base64_payload(image);
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact).map_err(DrawingError::invalid)
}

/// Parses encoded image bytes, sniffing the format from its magic number.
pub fn materialize(bytes: &[u8]) -> Result<DynamicImage, DrawingError> {
    image::load_from_memory(bytes).map_err(DrawingError::invalid)
}
