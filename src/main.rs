use anyhow::Context;
use clap::Parser;
use rendition::config::Config;
use rendition::pipeline::{RenderRequest, Renderer};
use std::path::PathBuf;

/// Rendition - render cached image derivatives with watermarks
#[derive(Parser, Debug)]
#[command(name = "rendition")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Render request (YAML)
    #[arg(short, long)]
    request: PathBuf,

    /// Where to write the rendered image (default: next to the source)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    rendition::logging::init_subscriber(args.json_logs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {}", e))?;

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        config_file = %args.config.display(),
        backend = ?config.cache.backend,
        workers = config.worker_count(),
        "Configuration loaded successfully"
    );

    let request_yaml = std::fs::read_to_string(&args.request)
        .with_context(|| format!("Failed to read request {}", args.request.display()))?;
    let request: RenderRequest =
        serde_yaml::from_str(&request_yaml).context("Invalid render request")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    runtime.block_on(async {
        let renderer = Renderer::from_config(&config).await?;
        let outcome = renderer.render(&request).await?;

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| request.derivative_path(outcome.fingerprint));
        tokio::fs::write(&output, &outcome.bytes)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;

        let stats = renderer.cache().stats();
        tracing::info!(
            output = %output.display(),
            key = %outcome.fingerprint,
            bytes = outcome.bytes.len(),
            cache_hit = outcome.from_cache,
            hit_rate = stats.hit_rate(),
            "Render complete"
        );
        Ok::<(), anyhow::Error>(())
    })
}
