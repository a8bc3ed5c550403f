//! Watermark module for applying text and image watermarks to renders.
//!
//! # Features
//!
//! - **Text watermarks**: hex colors with alpha, fill/stroke styles,
//!   supersampled anti-aliasing
//! - **Image watermarks** from data URIs or files next to the asset, under
//!   the web root, or under a base directory
//! - **Absolute or percentage** sizes and offsets, with right/bottom anchors
//!
//! Watermarking never fails a render: anything that cannot be resolved or
//! drawn is skipped.

pub mod compositor;
pub mod config;
pub mod error;
pub mod position;
pub mod resolver;
pub mod text_renderer;

#[cfg(test)]
pub(crate) mod test_font;

// Re-export main types for convenience
pub use compositor::{
    apply_image_watermark, apply_text_watermark, apply_watermarks, blend_layer, blend_pixels,
    WatermarkLayer, OPAQUE_SOURCE_OPACITY,
};
pub use config::{
    DrawStyle, ImageWatermark, MeasurementMode, RenderQuality, TextWatermark, WatermarksSpec,
};
pub use error::WatermarkError;
pub use position::{placement, target_size, to_pixels, Dimensions, Offsets, PlacementPosition};
pub use resolver::{WatermarkResolver, WatermarkSource, DEFAULT_WEB_ROOT_NAME};
pub use text_renderer::{parse_color, TextMask, TextRenderer};
