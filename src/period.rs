//! Grid period estimate from the edge-map spectrum.
//!
//! Edges are taken from the normalized Sobel magnitude of the alpha-masked
//! luminance, projected onto each axis, and the dominant non-DC frequency of
//! each projection is converted into a wavelength in pixels. This is a cheap
//! cross-check for the mesh pixel width, not an input to it.
use crate::edges::{sobel_gradients, GradientNorm};
use crate::image::ops::masked_luminance;
use crate::params::PeriodParams;
use image::RgbaImage;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::Serialize;

/// Dominant period per axis, `None` when the profile has no periodic part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEstimate {
    pub period_x: Option<f32>,
    pub period_y: Option<f32>,
}

pub fn estimate_period(
    image: &RgbaImage,
    alpha_threshold: u8,
    params: &PeriodParams,
) -> PeriodEstimate {
    let luma = masked_luminance(image, alpha_threshold);
    let grad = sobel_gradients(&luma, GradientNorm::L2);
    let max = grad.mag.max_value();
    if max <= 0.0 {
        return PeriodEstimate::default();
    }

    let (w, h) = (luma.w, luma.h);
    let mut profile_x = vec![0.0f32; w];
    let mut profile_y = vec![0.0f32; h];
    for y in 0..h {
        for x in 0..w {
            if grad.mag.get(x, y) / max >= params.edge_threshold {
                profile_x[x] += 1.0;
                profile_y[y] += 1.0;
            }
        }
    }

    let mut planner = FftPlanner::<f32>::new();
    PeriodEstimate {
        period_x: dominant_period(&mut planner, &profile_x, params.min_period),
        period_y: dominant_period(&mut planner, &profile_y, params.min_period),
    }
}

/// Wavelength `n / f` of the strongest frequency `f` in `[1, n / min_period]`.
fn dominant_period(
    planner: &mut FftPlanner<f32>,
    profile: &[f32],
    min_period: usize,
) -> Option<f32> {
    let n = profile.len();
    let f_max = (n / min_period.max(2)).min(n / 2);
    if f_max < 1 {
        return None;
    }

    let fft = planner.plan_fft_forward(n);
    let mut buf: Vec<Complex<f32>> = profile.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buf);

    let dc = buf[0].norm();
    let mut best = (0usize, 0.0f32);
    for (f, c) in buf.iter().enumerate().take(f_max + 1).skip(1) {
        let mag = c.norm();
        if mag > best.1 {
            best = (f, mag);
        }
    }
    // Flat profiles leave only rounding noise outside DC.
    if best.0 == 0 || best.1 <= 1e-3 * dc.max(1.0) {
        return None;
    }
    Some(n as f32 / best.0 as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn vertical_stripes_have_a_horizontal_period_only() {
        let img = RgbaImage::from_fn(64, 32, |x, _| {
            if (x / 8) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let est = estimate_period(&img, 128, &PeriodParams::default());
        assert_eq!(est.period_x, Some(8.0));
        assert_eq!(est.period_y, None);
    }

    #[test]
    fn flat_image_has_no_period() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([90, 90, 90, 255]));
        assert_eq!(
            estimate_period(&img, 128, &PeriodParams::default()),
            PeriodEstimate::default()
        );
    }
}
