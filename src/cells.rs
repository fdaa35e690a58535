//! Cell quantizer: one output pixel per mesh cell.
//!
//! Each cell takes the most frequent RGB value among its source pixels. A
//! tie goes to the color seen first in raster order.
use crate::error::Result;
use crate::image::ops::flood_fill;
use crate::mesh::Mesh;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::collections::HashMap;

/// Collapse `image` to `cells_x × cells_y` pixels using `mesh`.
///
/// With `transparent_background` set, the four corners of the result are
/// flood filled with fully transparent black (see
/// [`make_background_transparent`]).
pub fn downsample(
    image: &RgbImage,
    mesh: &Mesh,
    transparent_background: bool,
) -> Result<RgbaImage> {
    mesh.check_fits(image.width(), image.height())?;
    let mut out = RgbaImage::from_fn(mesh.cells_x(), mesh.cells_y(), |i, j| {
        let (x0, x1, y0, y1) = mesh.cell_bounds(i, j);
        let Rgb([r, g, b]) = mode_color(image, x0, x1, y0, y1);
        Rgba([r, g, b, 255])
    });
    if transparent_background {
        make_background_transparent(&mut out);
    }
    Ok(out)
}

/// Most frequent color in `[x0, x1) × [y0, y1)`; black for an empty block.
pub fn mode_color(image: &RgbImage, x0: u32, x1: u32, y0: u32, y1: u32) -> Rgb<u8> {
    let mut counts: HashMap<[u8; 3], (u32, usize)> = HashMap::new();
    for y in y0..y1 {
        for x in x0..x1 {
            let seen = counts.len();
            counts.entry(image.get_pixel(x, y).0).or_insert((0, seen)).0 += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|(_, (na, fa)), (_, (nb, fb))| na.cmp(nb).then(fb.cmp(fa)))
        .map_or(Rgb([0, 0, 0]), |(c, _)| Rgb(c))
}

/// Flood fill from each corner with `(0, 0, 0, 0)`, exact color match,
/// 4-connected. Returns the number of pixels cleared.
pub fn make_background_transparent(image: &mut RgbaImage) -> usize {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return 0;
    }
    [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
        .into_iter()
        .map(|corner| flood_fill(image, corner, Rgba([0, 0, 0, 0])))
        .sum()
}
