// Watermark compositing through the public API

use base64::Engine;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use rendition::watermark::{
    apply_image_watermark, apply_text_watermark, apply_watermarks, ImageWatermark,
    MeasurementMode, TextRenderer, TextWatermark, WatermarkResolver, WatermarksSpec,
};
use std::io::Cursor;
use std::path::Path;

fn data_uri(image: DynamicImage) -> String {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageOutputFormat::Png).unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
    )
}

fn overlay(locator: String) -> ImageWatermark {
    ImageWatermark {
        locator,
        width: 0.0,
        height: 0.0,
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        size_mode: MeasurementMode::Absolute,
        position_mode: MeasurementMode::Absolute,
    }
}

fn canvas(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])))
}

#[test]
fn test_unresolvable_watermark_leaves_original_identical() {
    let original = canvas(40, 30);
    let spec = overlay("missing-logo.png".to_string());

    let result = apply_image_watermark(
        original.clone(),
        &spec,
        &WatermarkResolver::default(),
        Path::new("/nonexistent/wwwroot/photo.jpg"),
    );
    assert_eq!(result.to_rgba8(), original.to_rgba8());
}

#[test]
fn test_bottom_right_anchor_with_absolute_size() {
    let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
    let mut spec = overlay(data_uri(logo));
    spec.width = 10.0;
    spec.height = 10.0;
    spec.right = 5.0;
    spec.bottom = 5.0;

    let result = apply_image_watermark(
        canvas(100, 80),
        &spec,
        &WatermarkResolver::default(),
        Path::new("photo.jpg"),
    )
    .to_rgba8();

    // Overlay spans x 85..95, y 65..75
    assert_eq!(*result.get_pixel(85, 65), Rgba([255, 0, 0, 255]));
    assert_eq!(*result.get_pixel(94, 74), Rgba([255, 0, 0, 255]));
    assert_eq!(*result.get_pixel(84, 65), Rgba([0, 0, 0, 255]));
    assert_eq!(*result.get_pixel(95, 75), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_opaque_source_is_blended_at_reduced_opacity() {
    let logo = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])));
    let mut spec = overlay(data_uri(logo));
    spec.width = 4.0;
    spec.height = 4.0;

    let result = apply_image_watermark(
        canvas(8, 8),
        &spec,
        &WatermarkResolver::default(),
        Path::new("photo.jpg"),
    )
    .to_rgba8();

    let pixel = result.get_pixel(1, 1);
    assert!((178..=179).contains(&pixel[0]), "got {:?}", pixel);
    assert_eq!(pixel[3], 255);
}

#[test]
fn test_negative_placement_is_clipped() {
    let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255])));
    let mut spec = overlay(data_uri(logo));
    spec.width = 10.0;
    spec.height = 10.0;
    spec.left = -5.0;
    spec.top = -5.0;

    let result = apply_image_watermark(
        canvas(20, 20),
        &spec,
        &WatermarkResolver::default(),
        Path::new("photo.jpg"),
    )
    .to_rgba8();

    assert_eq!(result.dimensions(), (20, 20));
    assert_eq!(*result.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
    assert_eq!(*result.get_pixel(4, 4), Rgba([0, 255, 0, 255]));
    assert_eq!(*result.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_text_without_font_is_noop() {
    let original = canvas(30, 30);
    let spec: TextWatermark = serde_yaml::from_str("value: hello\nx: 2\ny: 20").unwrap();

    let result = apply_text_watermark(original.clone(), &spec, &TextRenderer::without_font());
    assert_eq!(result.to_rgba8(), original.to_rgba8());
}

#[test]
fn test_apply_watermarks_draws_every_image_in_order() {
    let red = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])));
    let blue = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])));

    let mut first = overlay(data_uri(red));
    first.width = 4.0;
    first.height = 4.0;
    let mut second = overlay(data_uri(blue));
    second.width = 4.0;
    second.height = 4.0;
    second.left = 2.0;

    let spec = WatermarksSpec {
        text: vec![],
        image: vec![first, second],
    };
    let result = apply_watermarks(
        canvas(10, 10),
        &spec,
        &TextRenderer::without_font(),
        &WatermarkResolver::default(),
        Path::new("photo.jpg"),
    )
    .to_rgba8();

    assert_eq!(*result.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    // Later watermarks are drawn on top
    assert_eq!(*result.get_pixel(3, 0), Rgba([0, 0, 255, 255]));
    assert_eq!(*result.get_pixel(5, 0), Rgba([0, 0, 255, 255]));
    assert_eq!(*result.get_pixel(7, 0), Rgba([0, 0, 0, 255]));
}
