//! Render pipeline
//!
//! Turns a [`RenderRequest`] into encoded bytes: fingerprint the request,
//! consult the artifact cache, and on a miss decode, resize, watermark and
//! encode on a dedicated rayon pool before storing the result.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::cache::{build_cache, ArtifactCache, CacheError, Fingerprint};
use crate::config::Config;
use crate::image_optimizer::{
    decode_image, encode_image, resize_to_fit, EncoderQuality, ImageError, OutputFormat,
};
use crate::watermark::{apply_watermarks, TextRenderer, WatermarkResolver, WatermarksSpec};

fn default_quality() -> u8 {
    80
}

/// One derivative of a source image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub source: PathBuf,
    /// Bounding box; the result fits inside and is never enlarged
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: OutputFormat,
    /// Encoder quality 1-100 (default: 80)
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub watermarks: WatermarksSpec,
}

impl RenderRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            width: None,
            height: None,
            format: OutputFormat::default(),
            quality: default_quality(),
            watermarks: WatermarksSpec::default(),
        }
    }

    /// Default location for a rendered derivative: next to the source,
    /// named `<stem>.<fingerprint>.<ext>`
    pub fn derivative_path(&self, fingerprint: Fingerprint) -> PathBuf {
        let stem = self
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "render".to_string());
        self.source.with_file_name(format!(
            "{}.{}.{}",
            stem,
            fingerprint,
            self.format.extension()
        ))
    }
}

impl Fingerprint {
    /// Fingerprint of a request against a specific version of its source
    ///
    /// SHA-256 over the request's JSON form followed by the source's
    /// modification time in nanoseconds since the Unix epoch.
    pub fn for_request(request: &RenderRequest, source_modified: SystemTime) -> Fingerprint {
        let mut material = serde_json::to_vec(request).unwrap_or_default();
        let nanos = source_modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        material.extend_from_slice(&nanos.to_be_bytes());
        Fingerprint::from_bytes(&material)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot read source image: {0}")]
    Source(#[source] std::io::Error),
    #[error("{0}")]
    Decode(ImageError),
    #[error("{0}")]
    Resize(ImageError),
    #[error("{0}")]
    Encode(ImageError),
    #[error("Artifact cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Render worker pool error: {0}")]
    WorkerPool(String),
    #[error("Render worker exited before returning a result")]
    WorkerGone,
}

/// Result of a render
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub bytes: Bytes,
    pub fingerprint: Fingerprint,
    pub from_cache: bool,
}

/// Shared, read-only state used by render workers
struct RenderContext {
    resolver: WatermarkResolver,
    text_renderer: TextRenderer,
}

/// Renders derivatives through an artifact cache
pub struct Renderer {
    cache: Arc<dyn ArtifactCache>,
    context: Arc<RenderContext>,
    pool: Arc<rayon::ThreadPool>,
}

impl Renderer {
    pub fn new(
        cache: Arc<dyn ArtifactCache>,
        resolver: WatermarkResolver,
        text_renderer: TextRenderer,
        workers: usize,
    ) -> Result<Self, RenderError> {
        if workers == 0 {
            return Err(RenderError::WorkerPool(
                "worker count must be >= 1".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rendition-render-{}", i))
            // A panicking job drops its result sender; the caller sees WorkerGone
            .panic_handler(|payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(panic = %message, "Render job panicked");
            })
            .build()
            .map_err(|e| RenderError::WorkerPool(e.to_string()))?;

        Ok(Self {
            cache,
            context: Arc::new(RenderContext {
                resolver,
                text_renderer,
            }),
            pool: Arc::new(pool),
        })
    }

    /// Build the cache backend, resolver, font and worker pool from configuration
    pub async fn from_config(config: &Config) -> Result<Self, RenderError> {
        let cache = build_cache(&config.cache).await?;
        let resolver = WatermarkResolver::new(
            config.watermark.web_root_name.clone(),
            config.watermark.base_dir.clone(),
        );
        let text_renderer = TextRenderer::new(config.watermark.font_path.as_deref());
        let workers = config.worker_count();

        tracing::info!(workers, "Renderer ready");
        Self::new(cache, resolver, text_renderer, workers)
    }

    pub fn cache(&self) -> &Arc<dyn ArtifactCache> {
        &self.cache
    }

    pub async fn render(&self, request: &RenderRequest) -> Result<RenderOutcome, RenderError> {
        let metadata = tokio::fs::metadata(&request.source)
            .await
            .map_err(RenderError::Source)?;
        let modified = metadata.modified().map_err(RenderError::Source)?;
        let key = Fingerprint::for_request(request, modified);

        if let Some(bytes) = self.cache.try_get(key).await? {
            tracing::debug!(key = %key, bytes = bytes.len(), "Render served from cache");
            return Ok(RenderOutcome {
                bytes,
                fingerprint: key,
                from_cache: true,
            });
        }

        let data = tokio::fs::read(&request.source)
            .await
            .map_err(RenderError::Source)?;

        let context = self.context.clone();
        let job = request.clone();
        let bytes = self
            .run_on_pool(move || render_pixels(&context, &job, &data))
            .await?;

        match self.cache.set(key, bytes.clone()).await {
            Ok(()) => {}
            // Too large for memory and not stored durably; the render itself succeeded
            Err(CacheError::StorageFull) => {
                tracing::warn!(key = %key, bytes = bytes.len(), "Artifact not cached");
            }
            Err(e) => return Err(e.into()),
        }
        tracing::info!(
            key = %key,
            source = %request.source.display(),
            format = request.format.as_str(),
            bytes = bytes.len(),
            "Rendered derivative"
        );

        Ok(RenderOutcome {
            bytes,
            fingerprint: key,
            from_cache: false,
        })
    }
}

impl Renderer {
    /// Run `job` on the render pool and wait for its result
    async fn run_on_pool<T, F>(&self, job: F) -> Result<T, RenderError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, RenderError> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.pool.spawn(move || {
            // Receiver may be gone if the caller was cancelled
            let _ = tx.send(job());
        });
        rx.await.map_err(|_| RenderError::WorkerGone)?
    }
}

/// CPU-bound half of a render
fn render_pixels(
    context: &RenderContext,
    request: &RenderRequest,
    data: &[u8],
) -> Result<Bytes, RenderError> {
    let quality = EncoderQuality::with_quality(request.quality).map_err(RenderError::Encode)?;

    let image = decode_image(data).map_err(RenderError::Decode)?;
    let image =
        resize_to_fit(image, request.width, request.height).map_err(RenderError::Resize)?;

    let image = if request.watermarks.is_empty() {
        image
    } else {
        apply_watermarks(
            image,
            &request.watermarks,
            &context.text_renderer,
            &context.resolver,
            &request.source,
        )
    };

    let encoded = encode_image(&image, request.format, quality).map_err(RenderError::Encode)?;
    Ok(Bytes::from(encoded))
}
