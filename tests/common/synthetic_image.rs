#![allow(dead_code)]

use image::{Rgba, RgbaImage};

/// High-contrast gray checkerboard with square cells of `cell` pixels.
pub fn checkerboard_rgba(width: u32, height: u32, cell: u32) -> RgbaImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");
    RgbaImage::from_fn(width, height, |x, y| {
        let v = if (x / cell + y / cell) % 2 == 0 { 32 } else { 220 };
        Rgba([v, v, v, 255])
    })
}

/// 16-color sprite where every horizontal and vertical neighbour differs in
/// palette index by at least 3 (so luminance steps stay large).
pub fn sprite_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let i = ((3 * x + 5 * y) % 16) as u8;
        let v = 17 * i;
        Rgba([v, v, v / 2 + 40, 255])
    })
}

/// Replicate each pixel of `image` into a `factor × factor` block.
pub fn upscale_nearest(image: &RgbaImage, factor: u32) -> RgbaImage {
    RgbaImage::from_fn(image.width() * factor, image.height() * factor, |x, y| {
        *image.get_pixel(x / factor, y / factor)
    })
}
