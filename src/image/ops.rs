//! Pixel-level operations on `image` buffers.
//!
//! Resampling is restricted to integer factors: area averaging over `k×k`
//! blocks for downscaling and pixel replication for upscaling. Both are exact
//! inverses on images that are already block-constant, which the scale search
//! relies on.
use super::ImageF32;
use crate::error::{Error, Result};
use image::{ImageBuffer, Pixel, Rgb, RgbImage, Rgba, RgbaImage};

/// Rec. 601 luma weights.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Crop `margin` pixels from every side. Images too small to crop are
/// returned unchanged.
pub fn crop_border(image: &RgbaImage, margin: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if margin == 0 || w <= 2 * margin || h <= 2 * margin {
        return image.clone();
    }
    image::imageops::crop_imm(image, margin, margin, w - 2 * margin, h - 2 * margin).to_image()
}

/// Copy the rectangle `(x, y, w, h)` out of `image`.
pub fn crop_region(image: &RgbaImage, x: u32, y: u32, w: u32, h: u32) -> Result<RgbaImage> {
    let (iw, ih) = image.dimensions();
    let inside = x.checked_add(w).is_some_and(|r| r <= iw)
        && y.checked_add(h).is_some_and(|b| b <= ih);
    if !inside {
        return Err(Error::RegionOutOfBounds {
            region: (x, y, w, h),
            width: iw,
            height: ih,
        });
    }
    Ok(image::imageops::crop_imm(image, x, y, w, h).to_image())
}

/// Luminance (0..255) with every pixel below `alpha_threshold` forced to 0,
/// so edge detection never fires on the transparent background.
pub fn masked_luminance(image: &RgbaImage, alpha_threshold: u8) -> ImageF32 {
    let (w, h) = image.dimensions();
    let mut out = ImageF32::new(w as usize, h as usize);
    for (x, y, px) in image.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let luma = if a < alpha_threshold {
            0.0
        } else {
            (LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32).floor()
        };
        out.set(x as usize, y as usize, luma);
    }
    out
}

/// Drop alpha, painting every pixel below `alpha_threshold` black.
pub fn rgba_to_masked_rgb(image: &RgbaImage, alpha_threshold: u8) -> RgbImage {
    let (w, h) = image.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        if a < alpha_threshold {
            Rgb([0, 0, 0])
        } else {
            Rgb([r, g, b])
        }
    })
}

/// Area-average downscale by an integer factor; trailing rows/columns that do
/// not fill a whole block are ignored.
pub fn area_downscale(image: &RgbaImage, factor: u32) -> Result<RgbaImage> {
    if factor == 0 {
        return Err(Error::invalid_parameter("factor", "must be >= 1"));
    }
    let (w, h) = image.dimensions();
    let (dw, dh) = (w / factor, h / factor);
    let block = factor * factor;
    let mut out = RgbaImage::new(dw, dh);
    for (bx, by, dst) in out.enumerate_pixels_mut() {
        let mut sums = [0u32; 4];
        for y in by * factor..(by + 1) * factor {
            for x in bx * factor..(bx + 1) * factor {
                for (sum, &c) in sums.iter_mut().zip(image.get_pixel(x, y).0.iter()) {
                    *sum += c as u32;
                }
            }
        }
        *dst = Rgba(sums.map(|s| ((s + block / 2) / block) as u8));
    }
    Ok(out)
}

/// Replicate every pixel into a `factor × factor` block.
pub fn nearest_upscale<P>(
    image: &ImageBuffer<P, Vec<P::Subpixel>>,
    factor: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let factor = factor.max(1);
    let (w, h) = image.dimensions();
    ImageBuffer::from_fn(w * factor, h * factor, |x, y| {
        *image.get_pixel(x / factor, y / factor)
    })
}

/// 4-connected flood fill with zero tolerance: only pixels exactly equal to
/// the seed color are replaced. Returns the number of pixels filled.
pub fn flood_fill(image: &mut RgbaImage, seed: (u32, u32), fill: Rgba<u8>) -> usize {
    let (w, h) = image.dimensions();
    if seed.0 >= w || seed.1 >= h {
        return 0;
    }
    let target = *image.get_pixel(seed.0, seed.1);
    if target == fill {
        return 0;
    }

    let mut filled = 0usize;
    let mut stack = vec![seed];
    while let Some((x, y)) = stack.pop() {
        if *image.get_pixel(x, y) != target {
            continue;
        }
        image.put_pixel(x, y, fill);
        filled += 1;
        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < w {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < h {
            stack.push((x, y + 1));
        }
    }
    filled
}

/// Draw 1-px vertical lines at `lines_x` and horizontal lines at `lines_y`
/// over an opaque copy of `image`.
pub fn overlay_grid_lines(
    image: &RgbaImage,
    lines_x: &[u32],
    lines_y: &[u32],
    color: Rgba<u8>,
) -> RgbaImage {
    let mut canvas = image.clone();
    let (w, h) = canvas.dimensions();
    for &x in lines_x.iter().filter(|&&x| x < w) {
        for y in 0..h {
            canvas.put_pixel(x, y, color);
        }
    }
    for &y in lines_y.iter().filter(|&&y| y < h) {
        for x in 0..w {
            canvas.put_pixel(x, y, color);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(w: u32, h: u32, k: u32) -> RgbaImage {
        RgbaImage::from_fn(w * k, h * k, |x, y| {
            let (cx, cy) = ((x / k) as u8, (y / k) as u8);
            Rgba([cx * 40, cy * 40, cx ^ cy, 255])
        })
    }

    #[test]
    fn area_downscale_inverts_nearest_upscale() {
        let small = blocks(5, 3, 1);
        let big = nearest_upscale(&small, 4);
        assert_eq!(big.dimensions(), (20, 12));
        let back = area_downscale(&big, 4).unwrap();
        assert_eq!(back, small);
    }

    #[test]
    fn area_downscale_rounds_block_mean() {
        let img = RgbaImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) | (1, 0) => Rgba([1, 0, 3, 255]),
            _ => Rgba([0, 0, 0, 255]),
        });
        let out = area_downscale(&img, 2).unwrap();
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(out.get_pixel(0, 0).0, [1, 0, 2, 255]);

        let strip = RgbaImage::new(3, 1);
        assert_eq!(area_downscale(&strip, 2).unwrap().dimensions(), (1, 0));
    }

    #[test]
    fn flood_fill_respects_exact_match() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([10, 10, 10, 255]));
        img.put_pixel(2, 0, Rgba([11, 10, 10, 255]));
        img.put_pixel(2, 1, Rgba([11, 10, 10, 255]));
        img.put_pixel(2, 2, Rgba([11, 10, 10, 255]));
        img.put_pixel(2, 3, Rgba([11, 10, 10, 255]));
        let filled = flood_fill(&mut img, (0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(filled, 8, "fill must stop at the near-matching column");
        assert_eq!(img.get_pixel(3, 3).0, [10, 10, 10, 255]);
        assert_eq!(flood_fill(&mut img, (0, 0), Rgba([0, 0, 0, 0])), 0);
    }

    #[test]
    fn masked_luminance_zeroes_transparent_pixels() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 100]));
        let luma = masked_luminance(&img, 128);
        assert!(luma.get(0, 0) >= 254.0);
        assert_eq!(luma.get(1, 0), 0.0);
    }

    #[test]
    fn crop_region_rejects_out_of_bounds() {
        let img = blocks(2, 2, 2);
        assert!(crop_region(&img, 1, 1, 3, 3).is_ok());
        assert!(matches!(
            crop_region(&img, 2, 0, 3, 1),
            Err(Error::RegionOutOfBounds { .. })
        ));
    }
}
