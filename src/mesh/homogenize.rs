use crate::error::{Error, Result};
use crate::params::GapPolicy;

/// Subdivide every gap between consecutive `lines` into `round(gap /
/// pixel_width)` near-equal sections.
///
/// Intermediate coordinates are `start + floor(i * gap / n)`; the next
/// detected line is always re-emitted as is, so rounding never drifts across
/// sections. `lines` must be sorted ascending. The first and last coordinate
/// are preserved under both policies.
///
/// A gap that rounds to zero sections is handled by `policy`:
/// [`GapPolicy::Collapse`] drops the detected line that opens it (the one
/// that closes it when the gap is the first), [`GapPolicy::Preserve`] keeps
/// it as a single narrow section.
pub fn homogenize_lines(
    lines: &[u32],
    pixel_width: f64,
    policy: GapPolicy,
) -> Result<Vec<u32>> {
    if !(pixel_width.is_finite() && pixel_width > 0.0) {
        return Err(Error::InvalidPixelWidth(pixel_width));
    }
    let Some((&last, _)) = lines.split_last() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(lines.len());
    let mut skip_next_start = false;
    for (i, pair) in lines.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        let gap = end.saturating_sub(start);
        let sections = match policy {
            GapPolicy::Collapse => sections_for(gap, pixel_width),
            GapPolicy::Preserve => sections_for(gap, pixel_width).max(1),
        };

        if sections == 0 {
            if i == 0 {
                out.push(start);
                skip_next_start = true;
            }
            continue;
        }

        let first = if std::mem::take(&mut skip_next_start) { 1 } else { 0 };
        for k in first..sections {
            out.push(start + (k as u64 * gap as u64 / sections as u64) as u32);
        }
    }
    if out.last() != Some(&last) {
        out.push(last);
    }
    Ok(out)
}

/// Number of pixel-width sections in `gap`, never more than one per pixel.
fn sections_for(gap: u32, pixel_width: f64) -> u32 {
    let n = (gap as f64 / pixel_width).round();
    (n as u32).min(gap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_missing_lines_evenly() {
        let out = homogenize_lines(&[0, 10, 40, 50], 10.0, GapPolicy::Collapse).unwrap();
        assert_eq!(out, vec![0, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn subdivisions_floor_and_restore_the_end() {
        // 31 / 10 rounds to 3 sections: 0, 10, 20, then 31 restored.
        let out = homogenize_lines(&[0, 31], 10.0, GapPolicy::Collapse).unwrap();
        assert_eq!(out, vec![0, 10, 20, 31]);
    }

    #[test]
    fn collapse_drops_the_line_opening_a_tiny_gap() {
        let out = homogenize_lines(&[0, 10, 20, 22, 32], 10.0, GapPolicy::Collapse).unwrap();
        assert_eq!(out, vec![0, 10, 22, 32]);
    }

    #[test]
    fn collapse_keeps_the_first_line() {
        let out = homogenize_lines(&[0, 2, 12, 22], 10.0, GapPolicy::Collapse).unwrap();
        assert_eq!(out, vec![0, 12, 22]);
        let single = homogenize_lines(&[0, 3], 10.0, GapPolicy::Collapse).unwrap();
        assert_eq!(single, vec![0, 3]);
    }

    #[test]
    fn preserve_keeps_every_detected_line() {
        let lines = [0, 10, 20, 22, 32];
        let out = homogenize_lines(&lines, 10.0, GapPolicy::Preserve).unwrap();
        assert_eq!(out, lines.to_vec());
    }

    #[test]
    fn never_shrinks_when_width_fits_every_gap() {
        let lines = [0, 7, 19, 40, 41, 63];
        let out = homogenize_lines(&lines, 1.0, GapPolicy::Collapse).unwrap();
        assert!(out.len() >= lines.len());
        assert_eq!(out.first(), Some(&0));
        assert_eq!(out.last(), Some(&63));
        assert!(out.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rejects_invalid_width() {
        for pw in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                homogenize_lines(&[0, 10], pw, GapPolicy::Collapse),
                Err(Error::InvalidPixelWidth(_))
            ));
        }
    }
}
