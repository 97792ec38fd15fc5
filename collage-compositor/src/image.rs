//! Decoding of still-image content into [`Raster`] buffers.
//!
//! Image blocks carry an opaque source reference; by the time bytes reach
//! this module the transport has already happened. Both raw encoded bytes and
//! `data:` URIs (base64 or percent-encoded) are accepted.

use crate::error::{CompositorError, CompositorResult};
use crate::raster::Raster;

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) into an RGBA raster.
///
/// # Errors
///
/// Returns [`CompositorError::Codec`] if the bytes are not a decodable image.
pub fn decode_image(data: &[u8]) -> CompositorResult<Raster> {
    let img = image::load_from_memory(data)?;
    Ok(Raster::from(img.to_rgba8()))
}

/// Decode an image from a data URI.
///
/// Supports formats like: `data:image/png;base64,iVBORw0KGgo...`
///
/// # Errors
///
/// Returns an error if the URI is malformed or the payload cannot be decoded.
pub fn decode_data_uri(uri: &str) -> CompositorResult<Raster> {
    if !uri.starts_with("data:") {
        return Err(CompositorError::Resource("not a data URI".to_string()));
    }

    let uri_data = &uri[5..]; // Skip "data:"

    let comma_pos = uri_data
        .find(',')
        .ok_or_else(|| CompositorError::Resource("data URI is missing a comma".to_string()))?;

    let metadata = &uri_data[..comma_pos];
    let encoded_data = &uri_data[comma_pos + 1..];

    let bytes = if metadata.contains(";base64") {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(encoded_data)
            .map_err(|e| CompositorError::Resource(format!("failed to decode base64: {e}")))?
    } else {
        percent_decode(encoded_data)?
    };

    decode_image(&bytes)
}

/// Simple URL decoding (percent-encoding).
fn percent_decode(input: &str) -> CompositorResult<Vec<u8>> {
    let mut result = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();

    while let Some(b) = bytes.next() {
        if b == b'%' {
            if let (Some(hi), Some(lo)) = (bytes.next(), bytes.next()) {
                let pair = [hi, lo];
                let hex = std::str::from_utf8(&pair).unwrap_or("");
                if let Ok(byte) = u8::from_str_radix(hex, 16) {
                    result.push(byte);
                    continue;
                }
            }
            return Err(CompositorError::Resource(
                "invalid percent encoding in data URI".to_string(),
            ));
        }
        result.push(b);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal valid PNG (1x1 red pixel).
    const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_image_from_bytes() {
        use base64::Engine;
        let png = base64::engine::general_purpose::STANDARD
            .decode(RED_PIXEL_PNG)
            .expect("test PNG should be valid base64");

        let raster = decode_image(&png).expect("PNG should decode");
        assert_eq!(raster.width(), 1);
        assert_eq!(raster.height(), 1);
        assert_eq!(raster.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_decode_image_rejects_garbage() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(CompositorError::Codec(_))));
    }

    #[test]
    fn test_data_uri_parsing() {
        let data_uri = format!("data:image/png;base64,{RED_PIXEL_PNG}");

        let raster = decode_data_uri(&data_uri).expect("should parse valid data URI");
        assert_eq!(raster.width(), 1);
        assert_eq!(raster.height(), 1);
    }

    #[test]
    fn test_invalid_data_uri() {
        let result = decode_data_uri("not a data uri");
        assert!(result.is_err());

        let result = decode_data_uri("data:image/png");
        assert!(result.is_err()); // Missing comma

        let result = decode_data_uri("data:image/png;base64,!!!not-base64!!!");
        assert!(result.is_err());
    }

    #[test]
    fn test_percent_decode() {
        let decoded = percent_decode("abc%20def").expect("valid encoding");
        assert_eq!(decoded, b"abc def");

        assert!(percent_decode("abc%2").is_err());
        assert!(percent_decode("abc%zz").is_err());
    }
}
