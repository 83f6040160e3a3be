//! Photo re-compression.

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType};
use log::warn;

/// Quality used for stored photos and report images
pub const JPEG_QUALITY: u8 = 75;

/// Encode an image as baseline RGB JPEG
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .context("Failed to encode JPEG")?;
    Ok(buffer)
}

/// Re-compress a picked image to JPEG. Bytes that cannot be decoded as an
/// image are kept as they are.
pub fn compress_photo(data: Vec<u8>) -> Vec<u8> {
    let decoded = match image::load_from_memory(&data) {
        Ok(image) => image,
        Err(e) => {
            warn!("Storing photo without re-compression, could not decode it: {}", e);
            return data;
        }
    };

    match encode_jpeg(&decoded, JPEG_QUALITY) {
        Ok(jpeg) => jpeg,
        Err(e) => {
            warn!("Storing photo without re-compression: {}", e);
            data
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_images::sample_png;
    use super::*;

    #[test]
    fn test_png_is_recompressed_to_jpeg() {
        let jpeg = compress_photo(sample_png(16, 8));
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&jpeg).expect("Failed to decode JPEG");
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_undecodable_bytes_are_kept() {
        let data = b"not an image".to_vec();
        assert_eq!(compress_photo(data.clone()), data);
    }
}
