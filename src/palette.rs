//! Median-cut palette reduction.
//!
//! The input is alpha-masked first (pixels below the threshold become black)
//! and then reduced to at most `num_colors` RGB colors. An image that already
//! has few enough distinct colors keeps them exactly; otherwise the color
//! cube is split by median cut and each box is represented by its
//! count-weighted mean. Every pixel maps to the nearest palette entry.
use crate::error::{Error, Result};
use crate::image::ops::rgba_to_masked_rgb;
use crate::params::PaletteParams;
use image::{Rgb, RgbImage, RgbaImage};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Index-mapped image: `indices[y * width + x]` points into `palette`.
#[derive(Clone, Debug, PartialEq)]
pub struct PalettedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<Rgb<u8>>,
    pub indices: Vec<u8>,
}

impl PalettedImage {
    /// Expand back to full RGB.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            self.palette[self.indices[(y * self.width + x) as usize] as usize]
        })
    }
}

/// Reduce `image` to at most `params.num_colors` colors.
pub fn palette_img(image: &RgbaImage, params: &PaletteParams) -> Result<PalettedImage> {
    if !(1..=256).contains(&params.num_colors) {
        return Err(Error::InvalidColorCount(params.num_colors));
    }
    let rgb = rgba_to_masked_rgb(image, params.alpha_threshold);

    let mut counts: BTreeMap<[u8; 3], u32> = BTreeMap::new();
    for px in rgb.pixels() {
        *counts.entry(px.0).or_insert(0) += 1;
    }
    let palette = median_cut(counts.into_iter().collect(), params.num_colors);

    let mut cache: HashMap<[u8; 3], u8> = HashMap::new();
    let indices = rgb
        .pixels()
        .map(|px| {
            *cache
                .entry(px.0)
                .or_insert_with(|| nearest_index(&palette, px.0))
        })
        .collect();

    debug!(
        "palette: {} colors for {}x{} image",
        palette.len(),
        rgb.width(),
        rgb.height()
    );
    Ok(PalettedImage {
        width: rgb.width(),
        height: rgb.height(),
        palette: palette.into_iter().map(Rgb).collect(),
        indices,
    })
}

/// Distinct colors with their pixel counts.
struct ColorBox {
    colors: Vec<([u8; 3], u32)>,
}

impl ColorBox {
    fn pixel_count(&self) -> u64 {
        self.colors.iter().map(|&(_, n)| n as u64).sum()
    }

    fn widest_channel(&self) -> usize {
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for (c, _) in &self.colors {
            for ch in 0..3 {
                lo[ch] = lo[ch].min(c[ch]);
                hi[ch] = hi[ch].max(c[ch]);
            }
        }
        let range = |ch: usize| hi[ch] - lo[ch];
        if range(0) >= range(1) && range(0) >= range(2) {
            0
        } else if range(1) >= range(2) {
            1
        } else {
            2
        }
    }

    /// Split along the widest channel at the pixel-count median. Both halves
    /// are non-empty; callers only split boxes with two or more colors.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let ch = self.widest_channel();
        self.colors.sort_by_key(|(c, _)| c[ch]);

        let half = self.pixel_count() / 2;
        let mut running = 0u64;
        let mut split_at = self.colors.len() / 2;
        for (i, &(_, n)) in self.colors.iter().enumerate() {
            running += n as u64;
            if running >= half {
                split_at = i + 1;
                break;
            }
        }
        let split_at = split_at.clamp(1, self.colors.len() - 1);
        let right = self.colors.split_off(split_at);
        (self, ColorBox { colors: right })
    }

    fn mean_color(&self) -> [u8; 3] {
        let total = self.pixel_count().max(1);
        let mut sums = [0u64; 3];
        for &(c, n) in &self.colors {
            for ch in 0..3 {
                sums[ch] += c[ch] as u64 * n as u64;
            }
        }
        sums.map(|s| ((s + total / 2) / total) as u8)
    }
}

fn median_cut(colors: Vec<([u8; 3], u32)>, max_colors: usize) -> Vec<[u8; 3]> {
    if colors.len() <= max_colors {
        return colors.into_iter().map(|(c, _)| c).collect();
    }

    let mut boxes = vec![ColorBox { colors }];
    while boxes.len() < max_colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.colors.len() > 1)
            .max_by(|(ia, a), (ib, b)| {
                a.pixel_count()
                    .cmp(&b.pixel_count())
                    .then(ib.cmp(ia))
            })
            .map(|(i, _)| i);
        let Some(idx) = candidate else { break };

        let (left, right) = boxes.remove(idx).split();
        boxes.push(left);
        boxes.push(right);
    }

    let mut palette: Vec<[u8; 3]> = boxes.iter().map(ColorBox::mean_color).collect();
    palette.sort_unstable();
    palette.dedup();
    palette
}

fn nearest_index(palette: &[[u8; 3]], c: [u8; 3]) -> u8 {
    let dist = |p: &[u8; 3]| -> u32 {
        (0..3)
            .map(|ch| {
                let d = p[ch] as i32 - c[ch] as i32;
                (d * d) as u32
            })
            .sum()
    };
    palette
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| dist(p))
        .map_or(0, |(i, _)| i as u8)
}
