//! Pixel-grid mesh reconstruction.
//!
//! A [`Mesh`] is a pair of strictly ascending line sets; cell `(i, j)` spans
//! `[lines_x[i], lines_x[i+1]) × [lines_y[j], lines_y[j+1])`. The builder
//! detects candidate lines (Canny → closing → Hough), merges near-duplicates
//! with [`cluster_lines`], estimates the logical pixel size with
//! [`get_pixel_width`] and fills the gaps with [`homogenize_lines`].

mod builder;
mod cluster;
mod homogenize;
mod width;

pub use builder::{build_mesh, compute_mesh, compute_mesh_with_scaling, MeshBuild, ScaledMesh};
pub use cluster::cluster_lines;
pub use homogenize::homogenize_lines;
pub use width::get_pixel_width;

use crate::error::{Error, Result};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mesh {
    lines_x: Vec<u32>,
    lines_y: Vec<u32>,
}

impl Mesh {
    /// Validate and wrap two line sets: each needs at least two entries in
    /// strictly ascending order.
    pub fn new(lines_x: Vec<u32>, lines_y: Vec<u32>) -> Result<Self> {
        check_axis("x", &lines_x)?;
        check_axis("y", &lines_y)?;
        Ok(Self { lines_x, lines_y })
    }

    /// The trivial mesh over a `width × height` image: one cell.
    pub fn border_only(width: u32, height: u32) -> Result<Self> {
        Self::new(
            vec![0, width.saturating_sub(1)],
            vec![0, height.saturating_sub(1)],
        )
    }

    pub fn lines_x(&self) -> &[u32] {
        &self.lines_x
    }

    pub fn lines_y(&self) -> &[u32] {
        &self.lines_y
    }

    pub fn cells_x(&self) -> u32 {
        (self.lines_x.len() - 1) as u32
    }

    pub fn cells_y(&self) -> u32 {
        (self.lines_y.len() - 1) as u32
    }

    /// Only the two border lines on both axes.
    pub fn is_degenerate(&self) -> bool {
        self.lines_x.len() == 2 && self.lines_y.len() == 2
    }

    /// Pixel bounds `(x0, x1, y0, y1)` of cell `(i, j)`, end exclusive.
    pub fn cell_bounds(&self, i: u32, j: u32) -> (u32, u32, u32, u32) {
        let (i, j) = (i as usize, j as usize);
        (
            self.lines_x[i],
            self.lines_x[i + 1],
            self.lines_y[j],
            self.lines_y[j + 1],
        )
    }

    /// Error unless every cell lies inside a `width × height` image.
    pub fn check_fits(&self, width: u32, height: u32) -> Result<()> {
        let last_x = self.lines_x[self.lines_x.len() - 1];
        let last_y = self.lines_y[self.lines_y.len() - 1];
        if last_x > width || last_y > height {
            return Err(Error::InvalidMesh(format!(
                "mesh reaches ({last_x}, {last_y}) beyond a {width}x{height} image"
            )));
        }
        Ok(())
    }
}

fn check_axis(axis: &str, lines: &[u32]) -> Result<()> {
    if lines.len() < 2 {
        return Err(Error::InvalidMesh(format!(
            "axis {axis} needs at least 2 lines, got {}",
            lines.len()
        )));
    }
    if let Some(w) = lines.windows(2).find(|w| w[0] >= w[1]) {
        return Err(Error::InvalidMesh(format!(
            "axis {axis} is not strictly ascending at {} -> {}",
            w[0], w[1]
        )));
    }
    Ok(())
}
