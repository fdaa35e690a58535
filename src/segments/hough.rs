//! Probabilistic Hough transform over a binary edge map.
//!
//! Every edge pixel votes into a `(rho, theta)` accumulator. Bins holding at
//! least `vote_threshold` votes are then visited strongest first; each one
//! walks its line across a working copy of the edge mask, gathers the pixels
//! still present, splits them into runs at gaps longer than `max_gap` and
//! emits runs of at least `min_length`. Emitted pixels are removed from the
//! mask so later (weaker) bins cannot report the same line again.
use super::segment::LineSegment;
use crate::params::HoughParams;
use image::GrayImage;
use log::debug;

struct Accumulator {
    votes: Vec<u32>,
    n_rho: usize,
    cos: Vec<f32>,
    sin: Vec<f32>,
    rho_step: f32,
    rho_offset: f32,
}

impl Accumulator {
    fn new(w: u32, h: u32, params: &HoughParams) -> Self {
        let rho_step = params.rho.max(f32::EPSILON);
        let theta_step = params.theta_deg.max(f32::EPSILON).to_radians();
        let n_theta = ((std::f32::consts::PI / theta_step).round() as usize).max(1);
        let diag = ((w as f32).hypot(h as f32)).ceil();
        let n_rho = (2.0 * diag / rho_step).round() as usize + 1;
        let (sin, cos) = (0..n_theta)
            .map(|t| (t as f32 * theta_step).sin_cos())
            .unzip();
        Self {
            votes: vec![0; n_rho * n_theta],
            n_rho,
            cos,
            sin,
            rho_step,
            rho_offset: diag,
        }
    }

    fn n_theta(&self) -> usize {
        self.cos.len()
    }

    fn rho_index(&self, x: f32, y: f32, t: usize) -> Option<usize> {
        let r = ((x * self.cos[t] + y * self.sin[t] + self.rho_offset) / self.rho_step).round();
        (r >= 0.0 && (r as usize) < self.n_rho).then_some(r as usize)
    }

    fn vote(&mut self, x: u32, y: u32) {
        for t in 0..self.n_theta() {
            if let Some(r) = self.rho_index(x as f32, y as f32, t) {
                self.votes[t * self.n_rho + r] += 1;
            }
        }
    }

    /// Bins at or above `threshold`, strongest first, ties by bin index.
    fn peaks(&self, threshold: u32) -> Vec<(usize, usize)> {
        let mut bins: Vec<usize> = (0..self.votes.len())
            .filter(|&i| self.votes[i] >= threshold)
            .collect();
        bins.sort_by(|&a, &b| self.votes[b].cmp(&self.votes[a]).then(a.cmp(&b)));
        bins.into_iter()
            .map(|i| (i / self.n_rho, i % self.n_rho))
            .collect()
    }

    /// Pixel positions along the line of bin `(t, r)`, in walk order. The walk
    /// steps along y for steep lines and along x otherwise so consecutive
    /// samples are adjacent pixels.
    fn walk(&self, t: usize, r: usize, w: u32, h: u32) -> Vec<(u32, u32)> {
        let rho = r as f32 * self.rho_step - self.rho_offset;
        let (c, s) = (self.cos[t], self.sin[t]);
        let mut out = Vec::new();
        if s.abs() < c.abs() {
            for y in 0..h {
                let x = ((rho - y as f32 * s) / c).round();
                if x >= 0.0 && x < w as f32 {
                    out.push((x as u32, y));
                }
            }
        } else {
            for x in 0..w {
                let y = ((rho - x as f32 * c) / s).round();
                if y >= 0.0 && y < h as f32 {
                    out.push((x, y as u32));
                }
            }
        }
        out
    }
}

/// Detect straight segments in a binary edge map (non-zero = edge).
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let (w, h) = edges.dimensions();
    let mut mask: Vec<bool> = edges.pixels().map(|p| p[0] > 0).collect();
    let mut acc = Accumulator::new(w, h, params);
    for (x, y, p) in edges.enumerate_pixels() {
        if p[0] > 0 {
            acc.vote(x, y);
        }
    }

    let peaks = acc.peaks(params.vote_threshold.max(1));
    let mut segments = Vec::new();
    for (t, r) in peaks {
        let path = acc.walk(t, r, w, h);
        let present = path
            .iter()
            .filter(|&&(x, y)| mask[(y * w + x) as usize])
            .count();
        // Earlier segments may have consumed most of this bin's support.
        if (present as u32) < params.vote_threshold {
            continue;
        }

        for run in split_runs(&path, &mask, w, params.max_gap) {
            let (first, last) = (path[run.0], path[run.1]);
            let seg = LineSegment::new(
                [first.0 as i32, first.1 as i32],
                [last.0 as i32, last.1 as i32],
            );
            if seg.length() < params.min_length as f32 {
                continue;
            }
            for &(x, y) in &path[run.0..=run.1] {
                mask[(y * w + x) as usize] = false;
            }
            segments.push(seg);
        }
    }

    debug!(
        "hough: {}x{} edge map -> {} segments",
        w,
        h,
        segments.len()
    );
    segments
}

/// Index ranges `(first, last)` into `path` covering runs of set pixels whose
/// internal gaps never exceed `max_gap` samples.
fn split_runs(path: &[(u32, u32)], mask: &[bool], w: u32, max_gap: u32) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    for (i, &(x, y)) in path.iter().enumerate() {
        if !mask[(y * w + x) as usize] {
            continue;
        }
        current = match current {
            Some((start, end)) if i - end - 1 <= max_gap as usize => Some((start, i)),
            Some(done) => {
                runs.push(done);
                Some((i, i))
            }
            None => Some((i, i)),
        };
    }
    runs.extend(current);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::Orientation;
    use image::Luma;

    fn params() -> HoughParams {
        HoughParams {
            vote_threshold: 30,
            min_length: 20,
            max_gap: 3,
            ..HoughParams::default()
        }
    }

    #[test]
    fn finds_axis_aligned_lines() {
        let mut edges = GrayImage::new(60, 60);
        for i in 5..55 {
            edges.put_pixel(17, i, Luma([255]));
            edges.put_pixel(i, 40, Luma([255]));
        }
        let segs = detect_segments(&edges, &params());
        assert_eq!(segs.len(), 2, "got {segs:?}");

        let vertical: Vec<_> = segs
            .iter()
            .filter(|s| s.orientation(15.0) == Orientation::Vertical)
            .collect();
        assert_eq!(vertical.len(), 1);
        assert_eq!(vertical[0].midpoint()[0], 17);

        let horizontal: Vec<_> = segs
            .iter()
            .filter(|s| s.orientation(15.0) == Orientation::Horizontal)
            .collect();
        assert_eq!(horizontal.len(), 1);
        assert_eq!(horizontal[0].midpoint()[1], 40);
    }

    #[test]
    fn long_gaps_split_the_line() {
        let mut edges = GrayImage::new(40, 120);
        for y in (0..45).chain(70..115) {
            edges.put_pixel(8, y, Luma([255]));
        }
        let segs = detect_segments(&edges, &params());
        assert_eq!(segs.len(), 2, "got {segs:?}");
        assert!(segs.iter().all(|s| s.p0[0] == 8 && s.p1[0] == 8));
    }

    #[test]
    fn empty_map_yields_nothing() {
        let edges = GrayImage::new(32, 32);
        assert!(detect_segments(&edges, &HoughParams::default()).is_empty());
    }

    #[test]
    fn split_runs_bridges_short_gaps() {
        let path: Vec<(u32, u32)> = (0..10).map(|x| (x, 0)).collect();
        let mask = [true, true, false, false, true, false, false, false, false, true];
        assert_eq!(split_runs(&path, &mask, 10, 2), vec![(0, 4), (9, 9)]);
    }
}
