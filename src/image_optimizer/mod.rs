//! Image processing
//!
//! Decoding, Lanczos3 resampling via `fast_image_resize`, and JPEG/PNG
//! encoding for rendered derivatives and watermark overlays.

pub mod encoder;
pub mod error;
pub mod params;
pub mod processor;

pub use encoder::{EncoderFactory, ImageEncoder, JpegEncoder, PngEncoder};
pub use error::ImageError;
pub use params::{EncoderQuality, OutputFormat};
pub use processor::{
    decode_image, encode_image, fit_within, resample, resize_to_fit, within_output_limits,
    MAX_OUTPUT_DIMENSION, MAX_OUTPUT_PIXELS,
};
