//! Size and placement calculation for watermarks.
//!
//! Percentages are always taken against the *original* image: width for
//! x/left/right/width, height for y/top/bottom/height.
//!
//! ```
//! use rendition::watermark::position::{placement, Dimensions, Offsets};
//! use rendition::watermark::MeasurementMode;
//!
//! let original = Dimensions::new(1000, 800);
//! let overlay = Dimensions::new(100, 50);
//! let offsets = Offsets { right: 10.0, bottom: 10.0, ..Default::default() };
//!
//! let pos = placement(&original, &overlay, &offsets, MeasurementMode::Absolute);
//! assert_eq!((pos.x, pos.y), (890, 740));
//! ```

use super::config::{ImageWatermark, MeasurementMode};

/// Share of the original's shorter side used when no size is requested.
const DEFAULT_SIZE_RATIO: f64 = 0.2;

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a placed watermark. May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i64,
    pub y: i64,
}

impl PlacementPosition {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Edge offsets of an image watermark.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offsets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl From<&ImageWatermark> for Offsets {
    fn from(spec: &ImageWatermark) -> Self {
        Self {
            left: spec.left,
            top: spec.top,
            right: spec.right,
            bottom: spec.bottom,
        }
    }
}

/// Convert a value to pixels against `dimension`.
///
/// Percentages become `round(value * dimension / 100)`; absolute values are
/// rounded to the nearest pixel.
pub fn to_pixels(value: f32, dimension: u32, mode: MeasurementMode) -> i64 {
    match mode {
        MeasurementMode::Absolute => value.round() as i64,
        MeasurementMode::Percentage => (value as f64 * dimension as f64 / 100.0).round() as i64,
    }
}

fn derive(known: f64, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 1;
    }
    clamp_dimension(known * numerator as f64 / denominator as f64)
}

fn clamp_dimension(value: f64) -> u32 {
    let rounded = value.round();
    if rounded < 1.0 {
        1
    } else if rounded > u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Final size of an image watermark.
///
/// - Both width and height given: used directly.
/// - Exactly one given: the other follows the source's aspect ratio.
/// - Neither: the source's larger side (width on ties) becomes
///   `round(0.2 * min(original width, original height))`.
///
/// Every result is at least 1x1.
pub fn target_size(
    original: &Dimensions,
    source: &Dimensions,
    width: f32,
    height: f32,
    mode: MeasurementMode,
) -> Dimensions {
    let w = if width > 0.0 {
        Some(to_pixels(width, original.width, mode).max(1) as f64)
    } else {
        None
    };
    let h = if height > 0.0 {
        Some(to_pixels(height, original.height, mode).max(1) as f64)
    } else {
        None
    };

    match (w, h) {
        (Some(w), Some(h)) => Dimensions::new(clamp_dimension(w), clamp_dimension(h)),
        (Some(w), None) => Dimensions::new(
            clamp_dimension(w),
            derive(w, source.height, source.width),
        ),
        (None, Some(h)) => Dimensions::new(
            derive(h, source.width, source.height),
            clamp_dimension(h),
        ),
        (None, None) => {
            let default =
                (DEFAULT_SIZE_RATIO * original.width.min(original.height) as f64).round();
            if source.width >= source.height {
                Dimensions::new(
                    clamp_dimension(default),
                    derive(default, source.height, source.width),
                )
            } else {
                Dimensions::new(
                    derive(default, source.width, source.height),
                    clamp_dimension(default),
                )
            }
        }
    }
}

/// Top-left corner of the scaled watermark on the original.
///
/// A positive `right` overrides `left`, a positive `bottom` overrides `top`.
pub fn placement(
    original: &Dimensions,
    scaled: &Dimensions,
    offsets: &Offsets,
    mode: MeasurementMode,
) -> PlacementPosition {
    let x = if offsets.right > 0.0 {
        original.width as i64 - to_pixels(offsets.right, original.width, mode) - scaled.width as i64
    } else {
        to_pixels(offsets.left, original.width, mode)
    };

    let y = if offsets.bottom > 0.0 {
        original.height as i64
            - to_pixels(offsets.bottom, original.height, mode)
            - scaled.height as i64
    } else {
        to_pixels(offsets.top, original.height, mode)
    };

    PlacementPosition::new(x, y)
}

/// Check if a placed watermark overlaps the image at all.
pub fn is_visible(original: &Dimensions, scaled: &Dimensions, pos: &PlacementPosition) -> bool {
    pos.x < original.width as i64
        && pos.y < original.height as i64
        && pos.x + scaled.width as i64 > 0
        && pos.y + scaled.height as i64 > 0
}
