//! Watermark error types.
//!
//! These never leave the compositor: every variant maps to a silent
//! fallback (skip the watermark, draw unscaled, skip the text).

use std::fmt;

#[derive(Debug)]
pub enum WatermarkError {
    /// Watermark payload could not be decoded as an image
    DecodeError(String),

    /// Resampling the watermark failed
    ResizeError(String),

    /// No usable font for text watermarks
    FontError(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeError(msg) => write!(f, "Failed to decode watermark image: {}", msg),
            Self::ResizeError(msg) => write!(f, "Failed to resize watermark: {}", msg),
            Self::FontError(msg) => write!(f, "Failed to load watermark font: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
