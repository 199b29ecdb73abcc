//! Photo preparation: decode, square crop, downsample and re-encode as JPEG
//! so every photo can be embedded as a single DCTDecode XObject.

use crate::error::RenderError;
use bingo_types::{Size, TaxonId, POINTS_PER_INCH};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};

pub const JPEG_QUALITY: u8 = 85;

/// Resolution photos are downsampled to at their largest printed size.
pub const TARGET_DPI: f32 = 300.0;

#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub id: TaxonId,
    pub jpeg: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Size at 1px = 1pt, taken before downsampling.
    pub intrinsic: Size,
}

/// Prepares encoded photo bytes for embedding in a cell at most
/// `max_side_pt` points wide.
pub fn prepare_image(id: TaxonId, data: &[u8], max_side_pt: f32) -> Result<PreparedImage, RenderError> {
    let decoded = image::load_from_memory(data)?;
    let square = crop_to_square(&decoded);
    let side = square.width();
    if side == 0 {
        return Err(RenderError::Image(format!("Image for taxon {} is empty", id)));
    }

    let max_px = (max_side_pt / POINTS_PER_INCH * TARGET_DPI).ceil().max(1.0) as u32;
    let scaled = if side > max_px {
        log::debug!("Downsampling photo for taxon {} from {}px to {}px", id, side, max_px);
        square.resize_exact(max_px, max_px, FilterType::Lanczos3)
    } else {
        square
    };

    let rgb = scaled.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;

    Ok(PreparedImage {
        id,
        jpeg,
        pixel_width: rgb.width(),
        pixel_height: rgb.height(),
        intrinsic: Size::new(side as f32, side as f32),
    })
}

/// Largest centred square of `img`.
pub fn crop_to_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let side = width.min(height);
    img.crop_imm((width - side) / 2, (height - side) / 2, side, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([30, 120, 60]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_crop_to_square_takes_centre() {
        let wide = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
        let cropped = crop_to_square(&wide);
        assert_eq!((cropped.width(), cropped.height()), (20, 20));
    }

    #[test]
    fn test_small_photo_keeps_resolution() {
        let prepared = prepare_image(TaxonId(7), &png(40, 30), 100.8).unwrap();
        assert_eq!((prepared.pixel_width, prepared.pixel_height), (30, 30));
        assert_eq!(prepared.intrinsic, Size::new(30.0, 30.0));
        assert_eq!(&prepared.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_large_photo_is_downsampled() {
        // 14.4pt at 300 dpi is 60px.
        let prepared = prepare_image(TaxonId(1), &png(200, 100), 14.4).unwrap();
        assert_eq!((prepared.pixel_width, prepared.pixel_height), (60, 60));
        assert_eq!(prepared.intrinsic, Size::new(100.0, 100.0));
    }

    #[test]
    fn test_corrupt_data_is_an_error() {
        let result = prepare_image(TaxonId(1), b"not an image", 100.0);
        assert!(matches!(result, Err(RenderError::Image(_))));
    }
}
