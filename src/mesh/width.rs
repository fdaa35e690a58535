use crate::error::{Error, Result};

/// Estimate the size of one logical pixel from the gaps between adjacent
/// lines of both axes.
///
/// Gaps from `lines_x` and `lines_y` are pooled (square pixels assumed), the
/// ones outside the `[trim_fraction, 1 - trim_fraction]` percentile band are
/// dropped and the median of what remains is returned. When trimming leaves
/// nothing the median of the full sample is used instead.
pub fn get_pixel_width(lines_x: &[u32], lines_y: &[u32], trim_fraction: f64) -> Result<f64> {
    let mut gaps: Vec<f64> = adjacent_gaps(lines_x)
        .chain(adjacent_gaps(lines_y))
        .collect();
    if gaps.is_empty() {
        return Err(Error::EmptyLines(lines_x.len().max(lines_y.len())));
    }
    gaps.sort_by(f64::total_cmp);

    let trim = trim_fraction.clamp(0.0, 0.5);
    let low = percentile(&gaps, trim);
    let high = percentile(&gaps, 1.0 - trim);
    let middle: Vec<f64> = gaps
        .iter()
        .copied()
        .filter(|&g| g >= low && g <= high)
        .collect();
    let sample = if middle.is_empty() { &gaps } else { &middle };

    let width = percentile(sample, 0.5);
    if !(width.is_finite() && width > 0.0) {
        return Err(Error::InvalidPixelWidth(width));
    }
    Ok(width)
}

fn adjacent_gaps(lines: &[u32]) -> impl Iterator<Item = f64> + '_ {
    lines.windows(2).map(|w| w[1] as f64 - w[0] as f64)
}

/// Linearly interpolated percentile of a sorted, non-empty sample;
/// `q` in `[0, 1]`.
pub(crate) fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
