//! Integer scale/offset search for sources without usable edges.
//!
//! Every candidate `(scale, offset_x, offset_y)` crops the largest region
//! starting at the offset whose sides are multiples of `scale`, area-averages
//! it down by `scale`, replicates it back up and scores the round trip by
//! mean squared error against the crop. Candidates are enumerated in
//! ascending `(scale, offset_x, offset_y)` order and scored independently
//! (in parallel with the `parallel` feature); the reduction walks them in
//! that order so the first-seen minimum wins regardless of thread timing.
//! A time budget stops the search between batches, leaving the best of a
//! prefix of the search order.
use crate::diagnostics::elapsed_ms;
use crate::error::{Error, Result};
use crate::image::ops::{area_downscale, crop_region, nearest_upscale};
use crate::params::ScaleSearchParams;
use image::RgbaImage;
use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Candidates scored between two deadline checks.
const SCORE_BATCH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleCandidate {
    pub scale: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl ScaleCandidate {
    /// `(x, y, w, h)` of the scored region inside a `width × height` image,
    /// or `None` when it would be empty.
    pub fn region(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let k = self.scale;
        let rw = width.checked_sub(self.offset_x)? / k * k;
        let rh = height.checked_sub(self.offset_y)? / k * k;
        (rw > 0 && rh > 0).then_some((self.offset_x, self.offset_y, rw, rh))
    }
}

/// Winning candidate of [`estimate_scale_and_offset`].
#[derive(Clone, Debug)]
pub struct ScaleEstimate {
    pub scale: u32,
    pub offset: (u32, u32),
    pub mse: f64,
    /// The winning region downscaled by `scale`: the recovered native image.
    pub image: RgbaImage,
    /// Candidates actually scored before the budget ran out.
    pub evaluated: usize,
    /// Candidates enumerated.
    pub candidates: usize,
}

/// Mean squared error over all four channels of two equally sized images.
pub fn compute_mse(a: &RgbaImage, b: &RgbaImage) -> Result<f64> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::ShapeMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }
    let n = a.as_raw().len();
    if n == 0 {
        return Ok(0.0);
    }
    let sum: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&p, &q)| {
            let d = p as i64 - q as i64;
            (d * d) as u64
        })
        .sum();
    Ok(sum as f64 / n as f64)
}

/// Enumerate candidates for a `width × height` image in search order.
///
/// Scales run over `[min_scale, min(max_scale, width, height)]`, offsets over
/// `[0, min(scale - 1, max_offset)]` on each axis. Candidates with an empty
/// region are skipped; `max_candidates` truncates the list.
pub fn scale_candidates(
    width: u32,
    height: u32,
    params: &ScaleSearchParams,
) -> Vec<ScaleCandidate> {
    let min_scale = params.min_scale.max(1);
    let max_scale = params.max_scale.min(width).min(height);
    let mut out = Vec::new();
    for scale in min_scale..=max_scale {
        let max_offset = (scale - 1).min(params.max_offset);
        for offset_x in 0..=max_offset {
            for offset_y in 0..=max_offset {
                let cand = ScaleCandidate {
                    scale,
                    offset_x,
                    offset_y,
                };
                if cand.region(width, height).is_some() {
                    out.push(cand);
                }
            }
        }
    }
    if let Some(cap) = params.max_candidates {
        out.truncate(cap);
    }
    out
}

/// Round-trip a candidate's region and return `(mse, downscaled)`.
pub fn reconstruct(image: &RgbaImage, cand: &ScaleCandidate) -> Result<(f64, RgbaImage)> {
    let (w, h) = image.dimensions();
    let (x, y, rw, rh) = cand.region(w, h).ok_or_else(|| {
        Error::invalid_parameter(
            "candidate",
            format!("{cand:?} leaves no region in a {w}x{h} image"),
        )
    })?;
    let region = crop_region(image, x, y, rw, rh)?;
    let down = area_downscale(&region, cand.scale)?;
    let up = nearest_upscale(&down, cand.scale);
    let mse = compute_mse(&region, &up)?;
    Ok((mse, down))
}

/// Search integer scale factors and grid offsets for the best round-trip
/// reconstruction of `image`.
pub fn estimate_scale_and_offset(
    image: &RgbaImage,
    params: &ScaleSearchParams,
) -> Result<ScaleEstimate> {
    let (w, h) = image.dimensions();
    let start = Instant::now();
    let candidates = scale_candidates(w, h, params);
    let deadline = params
        .time_budget_ms
        .map(|ms| start + Duration::from_millis(ms));

    let score = |cand: &ScaleCandidate| reconstruct(image, cand).map(|(mse, _)| mse);

    // The deadline is checked between batches, so the scored candidates are
    // always a prefix of the search order.
    let mut scores: Vec<f64> = Vec::with_capacity(candidates.len());
    for batch in candidates.chunks(SCORE_BATCH) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        #[cfg(feature = "parallel")]
        let batch_scores: Vec<f64> = batch.par_iter().map(score).collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let batch_scores: Vec<f64> = batch.iter().map(score).collect::<Result<_>>()?;
        scores.extend(batch_scores);
    }

    let evaluated = scores.len();
    if evaluated < candidates.len() {
        warn!(
            "scale search hit its time budget: scored {} of {} candidates",
            evaluated,
            candidates.len()
        );
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, &mse) in scores.iter().enumerate() {
        if best.map_or(true, |(_, b)| mse < b) {
            best = Some((i, mse));
        }
    }
    let (idx, _) = best.ok_or(Error::NoScaleCandidate {
        width: w,
        height: h,
    })?;

    let winner = candidates[idx];
    let (mse, down) = reconstruct(image, &winner)?;
    debug!(
        "scale search: {} candidates in {:.1} ms",
        candidates.len(),
        elapsed_ms(start)
    );
    info!(
        "scale search: scale {} offset ({}, {}) mse {:.3}",
        winner.scale, winner.offset_x, winner.offset_y, mse
    );

    Ok(ScaleEstimate {
        scale: winner.scale,
        offset: (winner.offset_x, winner.offset_y),
        mse,
        image: down,
        evaluated,
        candidates: candidates.len(),
    })
}
