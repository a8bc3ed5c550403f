// Rendition: cached image derivatives with watermark compositing

pub mod cache;
pub mod config;
pub mod image_optimizer;
pub mod logging;
pub mod pipeline;
pub mod watermark;
