mod common;

use common::synthetic_image::{sprite_rgba, upscale_nearest};
use pixel_mesh::diagnostics::PixelateMethod;
use pixel_mesh::params::PipelineParams;
use pixel_mesh::{compute_mesh_with_scaling, downsample, palette_img, pixelate};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn upscaled_sprite_is_reproduced_exactly() {
    init_logging();
    let sprite = sprite_rgba(8, 8);
    let big = upscale_nearest(&sprite, 8);
    let params = PipelineParams::default();

    let scaled = compute_mesh_with_scaling(&big, 2, &params.mesh).expect("mesh");
    assert!(!scaled.build.is_degenerate());
    let expected: Vec<u32> = std::iter::once(0)
        .chain((1..8).map(|i| 16 * i - 1))
        .chain(std::iter::once(127))
        .collect();
    assert_eq!(scaled.build.mesh.lines_x(), expected.as_slice());
    assert_eq!(scaled.build.mesh.lines_y(), expected.as_slice());

    let paletted = palette_img(&scaled.image, &params.palette).expect("palette");
    assert_eq!(paletted.palette.len(), 16);
    let out = downsample(&paletted.to_rgb_image(), &scaled.build.mesh, false)
        .expect("downsample");
    assert_eq!(out, sprite);
}

#[test]
fn pixelate_uses_the_mesh_path() {
    init_logging();
    let sprite = sprite_rgba(8, 8);
    let big = upscale_nearest(&sprite, 8);

    let result = pixelate(&big, &PipelineParams::default()).expect("pixelate");
    assert_eq!(result.method, PixelateMethod::Mesh { upsample_factor: 2 });
    assert_eq!(result.image, sprite);
    assert_eq!(result.report.attempts.len(), 1);
    assert!(result.scale.is_none());
}

#[test]
fn transparent_background_and_display_scale() {
    init_logging();
    let sprite = sprite_rgba(8, 8);
    let big = upscale_nearest(&sprite, 8);
    let params = PipelineParams {
        transparent_background: true,
        pixel_size: 3,
        ..PipelineParams::default()
    };

    let result = pixelate(&big, &params).expect("pixelate");
    assert_eq!(result.image.dimensions(), (24, 24));
    // Corner cells differ from all their neighbours, so only they clear.
    assert_eq!(result.image.get_pixel(0, 0)[3], 0);
    assert_eq!(result.image.get_pixel(23, 23)[3], 0);
    assert_eq!(result.image.get_pixel(4, 4)[3], 255);
}
