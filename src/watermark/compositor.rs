//! Watermark compositor.
//!
//! Every function here consumes the original bitmap and returns the result.
//! Failures never surface: an unresolvable watermark or missing font leaves
//! the original untouched, a failed resample draws the watermark unscaled.

use super::config::{ImageWatermark, TextWatermark, WatermarksSpec};
use super::error::WatermarkError;
use super::position::{
    is_visible, placement, target_size, to_pixels, Dimensions, Offsets, PlacementPosition,
};
use super::resolver::WatermarkResolver;
use super::text_renderer::{color_or_black, TextRenderer};
use crate::image_optimizer::resample;
use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use std::path::Path;

/// Opacity applied to watermark sources without an alpha channel.
pub const OPAQUE_SOURCE_OPACITY: f32 = 0.7;

/// A watermark bitmap ready to be blended.
#[derive(Clone)]
pub struct WatermarkLayer {
    pub image: RgbaImage,
    pub position: PlacementPosition,
    /// Multiplied into the layer's own alpha (0.0 to 1.0)
    pub opacity: f32,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .field("opacity", &self.opacity)
            .finish()
    }
}

/// Apply every requested watermark: text first, then images, each in order.
pub fn apply_watermarks(
    original: DynamicImage,
    spec: &WatermarksSpec,
    text_renderer: &TextRenderer,
    resolver: &WatermarkResolver,
    asset_path: &Path,
) -> DynamicImage {
    let mut image = original;
    for text in &spec.text {
        image = apply_text_watermark(image, text, text_renderer);
    }
    for overlay in &spec.image {
        image = apply_image_watermark(image, overlay, resolver, asset_path);
    }
    image
}

/// Draw a line of text with its baseline starting at (x, y).
pub fn apply_text_watermark(
    original: DynamicImage,
    spec: &TextWatermark,
    renderer: &TextRenderer,
) -> DynamicImage {
    let Some(text) = renderer.render_mask(&spec.value, spec.size, spec.style, spec.quality) else {
        if !renderer.has_font() {
            tracing::warn!(text = %spec.value, "Skipping text watermark: no font available");
        }
        return original;
    };

    let color = color_or_black(&spec.color);
    let mut canvas = original.into_rgba8();
    let x = to_pixels(spec.x, canvas.width(), spec.position_mode);
    let y = to_pixels(spec.y, canvas.height(), spec.position_mode);

    blend_mask(
        &mut canvas,
        &text.mask,
        PlacementPosition::new(x + text.offset_x, y + text.offset_y),
        color,
    );
    DynamicImage::ImageRgba8(canvas)
}

/// Draw an image watermark resolved from `spec.locator`.
pub fn apply_image_watermark(
    original: DynamicImage,
    spec: &ImageWatermark,
    resolver: &WatermarkResolver,
    asset_path: &Path,
) -> DynamicImage {
    let Some(source) = resolver.resolve(&spec.locator, asset_path) else {
        return original;
    };

    let original_dims = Dimensions::new(original.width(), original.height());
    let source_dims = Dimensions::new(source.width(), source.height());
    let opacity = if source.color().has_alpha() {
        1.0
    } else {
        OPAQUE_SOURCE_OPACITY
    };

    let size = target_size(
        &original_dims,
        &source_dims,
        spec.width,
        spec.height,
        spec.size_mode,
    );
    let scaled = if size == source_dims {
        source.into_rgba8()
    } else {
        match resample(&source, size.width, size.height)
            .map_err(|e| WatermarkError::ResizeError(e.to_string()))
        {
            Ok(resized) => resized.into_rgba8(),
            Err(e) => {
                tracing::debug!(
                    locator = %spec.locator,
                    error = %e,
                    "Watermark resample failed, drawing unscaled"
                );
                source.into_rgba8()
            }
        }
    };

    let scaled_dims = Dimensions::new(scaled.width(), scaled.height());
    let position = placement(
        &original_dims,
        &scaled_dims,
        &Offsets::from(spec),
        spec.position_mode,
    );

    let mut canvas = original.into_rgba8();
    if is_visible(&original_dims, &scaled_dims, &position) {
        blend_layer(
            &mut canvas,
            &WatermarkLayer {
                image: scaled,
                position,
                opacity,
            },
        );
    }
    DynamicImage::ImageRgba8(canvas)
}

/// Clip the overlap of a `width` x `height` box at `position` to the target.
fn visible_region(
    target: &RgbaImage,
    position: PlacementPosition,
    width: u32,
    height: u32,
) -> (i64, i64, i64, i64) {
    let x_start = position.x.max(0);
    let y_start = position.y.max(0);
    let x_end = (position.x + width as i64).min(target.width() as i64);
    let y_end = (position.y + height as i64).min(target.height() as i64);
    (x_start, y_start, x_end, y_end)
}

/// Blend a single watermark layer onto the target image.
pub fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    let (x_start, y_start, x_end, y_end) = visible_region(
        target,
        layer.position,
        layer.image.width(),
        layer.image.height(),
    );

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wx = (tx - layer.position.x) as u32;
            let wy = (ty - layer.position.y) as u32;

            let wm_pixel = layer.image.get_pixel(wx, wy);
            let target_pixel = target.get_pixel(tx as u32, ty as u32);

            let blended = blend_pixels(*target_pixel, *wm_pixel, layer.opacity);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Tint a coverage mask with `color` and blend it onto the target.
fn blend_mask(target: &mut RgbaImage, mask: &GrayImage, position: PlacementPosition, color: Rgba<u8>) {
    let (x_start, y_start, x_end, y_end) =
        visible_region(target, position, mask.width(), mask.height());

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let coverage = mask.get_pixel((tx - position.x) as u32, (ty - position.y) as u32)[0];
            if coverage == 0 {
                continue;
            }
            let alpha = (color[3] as u32 * coverage as u32 + 127) / 255;
            let fg = Rgba([color[0], color[1], color[2], alpha as u8]);
            let bg = *target.get_pixel(tx as u32, ty as u32);
            target.put_pixel(tx as u32, ty as u32, blend_pixels(bg, fg, 1.0));
        }
    }
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
