//! Watermark request types.
//!
//! A request carries two ordered lists: text watermarks and image
//! watermarks. Both are applied in order, text first.
//!
//! ```yaml
//! text:
//!   - value: "© Example"
//!     size: 32
//!     color: "#80FFFFFF"
//!     style: stroke-and-fill
//!     quality: high
//!     x: 5
//!     y: 95
//! image:
//!   - locator: images/logo.png
//!     width: 20
//!     right: 2
//!     bottom: 2
//! ```

use serde::{Deserialize, Serialize};

fn default_text_size() -> f32 {
    24.0
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

/// How a numeric offset or size is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    /// Pixels
    Absolute,
    /// Percent of the original image's matching dimension
    #[default]
    Percentage,
}

/// Which parts of the glyphs are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DrawStyle {
    #[default]
    Fill,
    /// Outline only
    Stroke,
    StrokeAndFill,
}

/// Supersampling applied to the glyph mask before it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderQuality {
    None,
    #[default]
    Low,
    Medium,
    High,
}

impl RenderQuality {
    /// Mask supersampling factor
    pub fn supersample(&self) -> u32 {
        match self {
            Self::None | Self::Low => 1,
            Self::Medium => 2,
            Self::High => 4,
        }
    }
}

/// Text drawn onto the image with its baseline starting at (x, y).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextWatermark {
    pub value: String,

    /// Font size in pixels (default: 24)
    #[serde(default = "default_text_size")]
    pub size: f32,

    /// `#RGB`, `#ARGB`, `#RRGGBB` or `#AARRGGBB`; unparseable colors draw black
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub style: DrawStyle,

    #[serde(default)]
    pub quality: RenderQuality,

    #[serde(default)]
    pub x: f32,

    #[serde(default)]
    pub y: f32,

    #[serde(default)]
    pub position_mode: MeasurementMode,
}

/// Image overlay resolved from a locator string.
///
/// A zero width or height means "unspecified". Positive `right`/`bottom`
/// anchor the overlay to the right/bottom edge and override `left`/`top`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageWatermark {
    /// Data URI or filesystem path
    pub locator: String,

    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,

    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub bottom: f32,

    #[serde(default)]
    pub size_mode: MeasurementMode,

    #[serde(default)]
    pub position_mode: MeasurementMode,
}

/// Every watermark requested for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatermarksSpec {
    #[serde(default)]
    pub text: Vec<TextWatermark>,
    #[serde(default)]
    pub image: Vec<ImageWatermark>,
}

impl WatermarksSpec {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.image.is_empty()
    }
}
