//! Binary morphology with a rectangular structuring element.
//!
//! The `k×k` element is anchored at `k/2` (so even sizes reach one pixel
//! further toward negative offsets). Dilation uses the element, erosion its
//! reflection, which makes [`close`] extensive: every input edge pixel
//! survives. Samples outside the image are ignored.
use image::{GrayImage, Luma};

use super::canny::EDGE;

/// Morphological closing (dilate, then erode) bridging gaps narrower than
/// `kernel_size` in a binary edge map. Non-zero pixels count as foreground.
pub fn close(edges: &GrayImage, kernel_size: u32) -> GrayImage {
    if kernel_size <= 1 {
        return binarize(edges);
    }
    let anchor = kernel_size / 2;
    let reach = kernel_size - 1 - anchor;
    let (w, h) = edges.dimensions();
    let mask: Vec<bool> = edges.pixels().map(|p| p[0] > 0).collect();

    let dilated = filter_2d(&mask, w, h, reach, anchor, Reduce::Any);
    let closed = filter_2d(&dilated, w, h, anchor, reach, Reduce::All);

    GrayImage::from_fn(w, h, |x, y| {
        Luma([if closed[(y * w + x) as usize] { EDGE } else { 0 }])
    })
}

fn binarize(edges: &GrayImage) -> GrayImage {
    let (w, h) = edges.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        Luma([if edges.get_pixel(x, y)[0] > 0 { EDGE } else { 0 }])
    })
}

#[derive(Clone, Copy)]
enum Reduce {
    Any,
    All,
}

fn reduce(op: Reduce, mut window: impl Iterator<Item = bool>) -> bool {
    match op {
        Reduce::Any => window.any(|v| v),
        Reduce::All => window.all(|v| v),
    }
}

/// Separable rectangular filter over the window `[p - before, p + after]`.
fn filter_2d(
    mask: &[bool],
    w: u32,
    h: u32,
    before: u32,
    after: u32,
    op: Reduce,
) -> Vec<bool> {
    let (w, h) = (w as usize, h as usize);
    let (before, after) = (before as usize, after as usize);

    let mut rows = vec![false; w * h];
    for y in 0..h {
        let line = &mask[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(before);
            let hi = (x + after).min(w - 1);
            rows[y * w + x] = reduce(op, line[lo..=hi].iter().copied());
        }
    }

    let mut out = vec![false; w * h];
    for x in 0..w {
        for y in 0..h {
            let lo = y.saturating_sub(before);
            let hi = (y + after).min(h - 1);
            out[y * w + x] = reduce(op, (lo..=hi).map(|yy| rows[yy * w + x]));
        }
    }
    out
}
