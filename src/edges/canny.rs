//! Canny edge detector: Sobel gradients, non-maximum suppression along the
//! quantized gradient direction, and double-threshold hysteresis.
//!
//! No pre-blur is applied; pixel-art sources have hard steps and blurring
//! would only widen them. Ties between the two pixels straddling a step are
//! broken toward the "previous" pixel (left/up), so every step yields a
//! one-pixel line at a consistent side of the boundary.
//!
//! The outermost 1-pixel frame never carries an edge.
use super::grad::{sobel_gradients, GradientNorm};
use crate::image::{ImageF32, ImageView};
use crate::params::CannyParams;
use image::{GrayImage, Luma};

const TAN_22_5_DEG: f32 = 0.414_213_57;

pub const EDGE: u8 = 255;

/// Thin gradient magnitudes to one-pixel ridges. Suppressed pixels are 0.
pub fn non_maximum_suppression(l: &ImageF32) -> ImageF32 {
    let grad = sobel_gradients(l, GradientNorm::L1);
    let (w, h) = (l.w, l.h);
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= 0.0 {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0) == (gy >= 0.0);

            // (previous, next) neighbours along the gradient direction
            let (before, after) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag > before && mag >= after {
                out.set(x, y, mag);
            }
        }
    }

    out
}

/// Run the full detector on a 0..255 luminance image.
///
/// Ridge pixels at or above `high_threshold` seed edges; ridge pixels at or
/// above `low_threshold` join an edge when 8-connected to a seed.
pub fn canny(l: &ImageF32, params: &CannyParams) -> GrayImage {
    let thinned = non_maximum_suppression(l);
    hysteresis(&thinned, params.low_threshold, params.high_threshold)
}

fn hysteresis(thinned: &ImageF32, low: f32, high: f32) -> GrayImage {
    let (w, h) = (thinned.w, thinned.h);
    let mut out = GrayImage::new(w as u32, h as u32);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if thinned.get(x, y) < high || out.get_pixel(x as u32, y as u32)[0] == EDGE {
                continue;
            }
            out.put_pixel(x as u32, y as u32, Luma([EDGE]));
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                for ny in cy.saturating_sub(1)..=(cy + 1).min(h - 1) {
                    for nx in cx.saturating_sub(1)..=(cx + 1).min(w - 1) {
                        let px = out.get_pixel_mut(nx as u32, ny as u32);
                        if px[0] == EDGE || thinned.get(nx, ny) < low {
                            continue;
                        }
                        *px = Luma([EDGE]);
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_image(width: usize, height: usize, split_x: usize, hi: f32) -> ImageF32 {
        let mut img = ImageF32::new(width, height);
        for y in 0..height {
            for x in split_x..width {
                img.set(x, y, hi);
            }
        }
        img
    }

    #[test]
    fn vertical_step_yields_single_column_left_of_boundary() {
        let img = step_image(16, 12, 8, 200.0);
        let edges = canny(&img, &CannyParams::default());
        for y in 1..11 {
            assert_eq!(edges.get_pixel(7, y)[0], EDGE, "row {y} missing edge");
            assert_eq!(edges.get_pixel(8, y)[0], 0, "row {y} edge is two pixels wide");
        }
        assert_eq!(edges.get_pixel(7, 0)[0], 0, "frame must stay empty");
    }

    #[test]
    fn falling_step_keeps_the_same_side() {
        let mut img = step_image(16, 12, 8, 0.0);
        for y in 0..12 {
            for x in 0..8 {
                img.set(x, y, 200.0);
            }
        }
        let edges = canny(&img, &CannyParams::default());
        assert_eq!(edges.get_pixel(7, 5)[0], EDGE);
        assert_eq!(edges.get_pixel(8, 5)[0], 0);
    }

    #[test]
    fn weak_steps_are_rejected() {
        let img = step_image(16, 12, 8, 10.0);
        let edges = canny(&img, &CannyParams::default());
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn weak_ridge_connected_to_strong_seed_survives() {
        // Left half of the boundary is a strong step, right half a weak one.
        let mut img = ImageF32::new(20, 20);
        for y in 10..20 {
            for x in 0..20 {
                img.set(x, y, if x < 10 { 200.0 } else { 20.0 });
            }
        }
        let params = CannyParams {
            low_threshold: 50.0,
            high_threshold: 400.0,
        };
        let edges = canny(&img, &params);
        assert_eq!(edges.get_pixel(3, 9)[0], EDGE);
        assert_eq!(edges.get_pixel(16, 9)[0], EDGE);
    }
}
