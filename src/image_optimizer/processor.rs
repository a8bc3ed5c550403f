//! Image processing implementation
//!
//! Handles the pixel work of a render: decode → resize → (watermark) → encode

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::encoder::EncoderFactory;
use super::error::ImageError;
use super::params::{EncoderQuality, OutputFormat};

/// Largest width or height any resample or text mask may produce
pub const MAX_OUTPUT_DIMENSION: u32 = 10_000;

/// Largest pixel count any resample or text mask may produce
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Whether a `width` x `height` buffer stays within the output caps
pub fn within_output_limits(width: u64, height: u64) -> bool {
    width <= MAX_OUTPUT_DIMENSION as u64
        && height <= MAX_OUTPUT_DIMENSION as u64
        && width.saturating_mul(height) <= MAX_OUTPUT_PIXELS
}

/// Decode image data into a DynamicImage
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Dimensions that fit inside the requested box, preserving aspect ratio
///
/// Missing bounds are unconstrained; the result never exceeds the source.
pub fn fit_within(
    src_width: u32,
    src_height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (src_width, src_height);
    }

    let scale_w = max_width
        .filter(|w| *w > 0)
        .map(|w| w as f64 / src_width as f64)
        .unwrap_or(1.0);
    let scale_h = max_height
        .filter(|h| *h > 0)
        .map(|h| h as f64 / src_height as f64)
        .unwrap_or(1.0);
    let scale = scale_w.min(scale_h).min(1.0);

    if scale >= 1.0 {
        return (src_width, src_height);
    }

    let width = ((src_width as f64 * scale).round() as u32).clamp(1, src_width);
    let height = ((src_height as f64 * scale).round() as u32).clamp(1, src_height);
    (width, height)
}

/// Resize to exactly `target_w` x `target_h` using fast-image-resize with Lanczos3
pub fn resample(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, ImageError> {
    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;
    if !within_output_limits(target_w as u64, target_h as u64) {
        return Err(ImageError::resize_failed(format!(
            "Target {}x{} exceeds output limits",
            target_w, target_h
        )));
    }

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    let rgba_image = image::RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))?;

    Ok(DynamicImage::ImageRgba8(rgba_image))
}

/// Shrink to fit the requested bounds; returns the image untouched otherwise
pub fn resize_to_fit(
    img: DynamicImage,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> Result<DynamicImage, ImageError> {
    let (width, height) = fit_within(img.width(), img.height(), max_width, max_height);
    if (width, height) == (img.width(), img.height()) {
        return Ok(img);
    }
    resample(&img, width, height)
}

/// Encode to the requested output format
pub fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: EncoderQuality,
) -> Result<Vec<u8>, ImageError> {
    let rgba = img.to_rgba8();
    EncoderFactory::create(format).encode(rgba.as_raw(), rgba.width(), rgba.height(), quality)
}
