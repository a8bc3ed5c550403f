//! Text watermark rendering.
//!
//! Text is rasterized with `ab_glyph` into an 8-bit coverage mask that the
//! compositor then tints and blends onto the image.
//!
//! - Colors: `#RGB`, `#ARGB`, `#RRGGBB`, `#AARRGGBB` (`#` optional)
//! - Styles: fill, stroke (outline band), stroke and fill
//! - Quality: 1x, 2x or 4x supersampled masks
//!
//! The font is loaded once at construction, from an explicit path or the
//! first readable entry of [`SYSTEM_FONT_PATHS`].

use super::config::{DrawStyle, RenderQuality};
use super::WatermarkError;
use crate::image_optimizer::within_output_limits;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fonts tried when no `font_path` is configured.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Parse a color string.
///
/// Accepts `RGB`, `ARGB`, `RRGGBB` and `AARRGGBB` hex digits with an
/// optional leading `#`. Short forms double each digit. Returns `None` for
/// anything else.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([digit(0)?, digit(1)?, digit(2)?, 255])),
        4 => Some(Rgba([digit(1)?, digit(2)?, digit(3)?, digit(0)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(2)?, byte(4)?, byte(6)?, byte(0)?])),
        _ => None,
    }
}

/// Parse a color, falling back to opaque black.
pub fn color_or_black(value: &str) -> Rgba<u8> {
    parse_color(value).unwrap_or_else(|| {
        tracing::debug!(color = %value, "Unparseable watermark color, using black");
        Rgba([0, 0, 0, 255])
    })
}

/// Outline width in pixels for a font size.
pub fn stroke_width(size: f32) -> u32 {
    ((size / 16.0).round() as u32).max(1)
}

/// Coverage mask for a line of text.
///
/// `offset_x`/`offset_y` locate the mask's top-left corner relative to the
/// left end of the baseline.
#[derive(Debug, Clone)]
pub struct TextMask {
    pub mask: GrayImage,
    pub offset_x: i64,
    pub offset_y: i64,
}

/// Rasterizes text with a font loaded once.
#[derive(Clone)]
pub struct TextRenderer {
    font: Option<Arc<FontVec>>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl TextRenderer {
    /// Load the configured font, or the first usable system font.
    ///
    /// Never fails: without a font, text watermarks are skipped.
    pub fn new(font_path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match font_path {
            Some(path) => vec![path.to_path_buf()],
            None => SYSTEM_FONT_PATHS.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            match load_font(path) {
                Ok(font) => {
                    tracing::info!(font = %path.display(), "Loaded watermark font");
                    return Self {
                        font: Some(Arc::new(font)),
                    };
                }
                Err(e) if font_path.is_some() => {
                    tracing::warn!(font = %path.display(), error = %e, "Configured watermark font unusable");
                }
                Err(_) => {}
            }
        }

        tracing::warn!("No usable font found; text watermarks will be skipped");
        Self::without_font()
    }

    /// Build from raw TrueType/OpenType data.
    pub fn from_font_data(data: Vec<u8>) -> Result<Self, WatermarkError> {
        let font =
            FontVec::try_from_vec(data).map_err(|e| WatermarkError::FontError(e.to_string()))?;
        Ok(Self {
            font: Some(Arc::new(font)),
        })
    }

    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Rasterize `text` into a coverage mask.
    ///
    /// Returns `None` when there is no font or nothing to draw.
    pub fn render_mask(
        &self,
        text: &str,
        size: f32,
        style: DrawStyle,
        quality: RenderQuality,
    ) -> Option<TextMask> {
        let font = self.font.as_deref()?;
        if text.is_empty() || !size.is_finite() || size <= 0.0 {
            return None;
        }

        let factor = quality.supersample();
        let stroke = stroke_width(size);

        let metrics = font.as_scaled(PxScale::from(size));
        let ascent = metrics.ascent().ceil().max(0.0) as u32;
        let descent = (-metrics.descent()).ceil().max(0.0) as u32;
        let advance = layout_width(font, size, text).ceil().max(0.0) as u32;

        let Some((pad, width, height)) = mask_geometry(stroke, ascent, descent, advance, factor)
        else {
            tracing::debug!(
                text = %text,
                size = size,
                "Text mask exceeds output limits, skipping"
            );
            return None;
        };

        // Supersampled canvas, same layout scaled by `factor`
        let ss_size = size * factor as f32;
        let baseline_x = (pad * factor) as f32;
        let baseline_y = ((pad + ascent) * factor) as f32;
        let mut mask = GrayImage::new(width * factor, height * factor);
        draw_glyphs(font, ss_size, text, baseline_x, baseline_y, &mut mask);

        let mask = match style {
            DrawStyle::Fill => mask,
            DrawStyle::StrokeAndFill => dilate(&mask, stroke * factor),
            DrawStyle::Stroke => {
                let dilated = dilate(&mask, stroke * factor);
                subtract(&dilated, &mask)
            }
        };

        let mask = match factor {
            1 => mask,
            2 => imageops::resize(&mask, width, height, FilterType::Triangle),
            _ => imageops::resize(&mask, width, height, FilterType::Lanczos3),
        };

        Some(TextMask {
            mask,
            offset_x: -(pad as i64),
            offset_y: -((pad + ascent) as i64),
        })
    }
}

/// Padding and final mask size, or `None` when the supersampled canvas
/// would overflow or exceed the output limits.
fn mask_geometry(
    stroke: u32,
    ascent: u32,
    descent: u32,
    advance: u32,
    factor: u32,
) -> Option<(u32, u32, u32)> {
    let pad = stroke.checked_add(2)?;
    let width = advance.checked_add(pad.checked_mul(2)?)?;
    let height = ascent
        .checked_add(descent)?
        .checked_add(pad.checked_mul(2)?)?;
    let ss_width = width.checked_mul(factor)?;
    let ss_height = height.checked_mul(factor)?;
    within_output_limits(ss_width as u64, ss_height as u64).then_some((pad, width, height))
}

fn load_font(path: &Path) -> Result<FontVec, WatermarkError> {
    let data = std::fs::read(path).map_err(|e| WatermarkError::FontError(e.to_string()))?;
    FontVec::try_from_vec(data).map_err(|e| WatermarkError::FontError(e.to_string()))
}

/// Horizontal advance of a laid out line, including kerning.
fn layout_width(font: &FontVec, size: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0f32;
    let mut prev: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

fn draw_glyphs(
    font: &FontVec,
    size: f32,
    text: &str,
    baseline_x: f32,
    baseline_y: f32,
    mask: &mut GrayImage,
) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let (mask_w, mask_h) = (mask.width() as i32, mask.height() as i32);

    let mut cursor_x = baseline_x;
    let mut prev: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            cursor_x += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && y >= 0 && x < mask_w && y < mask_h {
                    let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    let existing = mask.get_pixel_mut(x as u32, y as u32);
                    // Overlapping glyphs keep the stronger coverage
                    existing.0[0] = existing.0[0].max(value);
                }
            });
        }

        cursor_x += scaled.h_advance(id);
        prev = Some(id);
    }
}

/// Grow coverage by `radius` pixels (square structuring element).
pub fn dilate(mask: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return mask.clone();
    }
    let (w, h) = mask.dimensions();
    let r = radius as i64;

    let mut horizontal = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let lo = (x as i64 - r).max(0) as u32;
            let hi = (x as i64 + r).min(w as i64 - 1) as u32;
            let value = (lo..=hi).map(|sx| mask.get_pixel(sx, y)[0]).max().unwrap_or(0);
            horizontal.put_pixel(x, y, Luma([value]));
        }
    }

    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        let lo = (y as i64 - r).max(0) as u32;
        let hi = (y as i64 + r).min(h as i64 - 1) as u32;
        for x in 0..w {
            let value = (lo..=hi)
                .map(|sy| horizontal.get_pixel(x, sy)[0])
                .max()
                .unwrap_or(0);
            out.put_pixel(x, y, Luma([value]));
        }
    }
    out
}

fn subtract(outer: &GrayImage, inner: &GrayImage) -> GrayImage {
    let mut out = outer.clone();
    for (o, i) in out.pixels_mut().zip(inner.pixels()) {
        o.0[0] = o.0[0].saturating_sub(i.0[0]);
    }
    out
}
