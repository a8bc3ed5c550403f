// End-to-end renders through a disk-backed renderer

use super::test_harness::{disk_config, write_png};
use image::Rgba;
use rendition::image_optimizer::{decode_image, OutputFormat};
use rendition::pipeline::{RenderRequest, Renderer};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn request_yaml(source: &std::path::Path) -> String {
    format!(
        r#"
source: {}
width: 50
format: png
watermarks:
  image:
    - locator: logo.png
      width: 10
      height: 10
      right: 0
      bottom: 0
      size_mode: absolute
      position_mode: absolute
"#,
        source.display()
    )
}

#[tokio::test]
async fn test_render_watermarked_derivative() {
    let site = TempDir::new().unwrap();
    let cache_root = TempDir::new().unwrap();
    let root = site.path().join("wwwroot");
    let source = root.join("photos").join("beach.png");
    write_png(&source, 200, 100, Rgba([10, 200, 10, 255]));
    write_png(&root.join("logo.png"), 10, 10, Rgba([255, 255, 255, 255]));

    let request: RenderRequest = serde_yaml::from_str(&request_yaml(&source)).unwrap();
    assert_eq!(request.format, OutputFormat::Png);

    let renderer = Renderer::from_config(&disk_config(&cache_root)).await.unwrap();
    let outcome = renderer.render(&request).await.unwrap();
    assert!(!outcome.from_cache);

    let image = decode_image(&outcome.bytes).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (50, 25));
    // Logo resolved from the web root, anchored to the bottom-right corner
    assert_eq!(*image.get_pixel(45, 20), Rgba([255, 255, 255, 255]));
    let background = image.get_pixel(10, 10);
    assert!(background[1] >= 195 && background[0] <= 15, "got {:?}", background);

    let stored = cache_root
        .path()
        .join(outcome.fingerprint.shard())
        .join(outcome.fingerprint.file_name());
    assert_eq!(std::fs::read(stored).unwrap(), outcome.bytes.to_vec());
}

#[tokio::test]
async fn test_new_renderer_reuses_disk_artifacts() {
    let site = TempDir::new().unwrap();
    let cache_root = TempDir::new().unwrap();
    let source = site.path().join("beach.png");
    write_png(&source, 64, 64, Rgba([1, 2, 3, 255]));

    let mut request = RenderRequest::new(&source);
    request.width = Some(32);

    let first = Renderer::from_config(&disk_config(&cache_root))
        .await
        .unwrap()
        .render(&request)
        .await
        .unwrap();
    assert!(!first.from_cache);

    let renderer = Renderer::from_config(&disk_config(&cache_root)).await.unwrap();
    let second = renderer.render(&request).await.unwrap();
    assert!(second.from_cache);
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(renderer.cache().stats().promotions, 1);
}

#[tokio::test]
async fn test_modified_source_is_rendered_again() {
    let site = TempDir::new().unwrap();
    let cache_root = TempDir::new().unwrap();
    let source = site.path().join("beach.png");
    write_png(&source, 16, 16, Rgba([1, 2, 3, 255]));

    let mut request = RenderRequest::new(&source);
    request.format = OutputFormat::Png;
    let renderer = Renderer::from_config(&disk_config(&cache_root)).await.unwrap();

    let before = renderer.render(&request).await.unwrap();

    write_png(&source, 16, 16, Rgba([200, 100, 0, 255]));
    let later = SystemTime::now() + Duration::from_secs(60);
    std::fs::File::options()
        .write(true)
        .open(&source)
        .unwrap()
        .set_modified(later)
        .unwrap();

    let after = renderer.render(&request).await.unwrap();
    assert!(!after.from_cache);
    assert_ne!(before.fingerprint, after.fingerprint);
    let pixel = *decode_image(&after.bytes).unwrap().to_rgba8().get_pixel(0, 0);
    assert_eq!(pixel, Rgba([200, 100, 0, 255]));
}
