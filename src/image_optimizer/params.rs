//! Output parameters for rendered derivatives

use serde::{Deserialize, Serialize};

use super::error::ImageError;

/// Encoded output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Encoder quality (1-100; ignored by lossless formats)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    pub quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

impl EncoderQuality {
    pub fn with_quality(quality: u8) -> Result<Self, ImageError> {
        if !(1..=100).contains(&quality) {
            return Err(ImageError::InvalidQuality { quality });
        }
        Ok(Self { quality })
    }
}
