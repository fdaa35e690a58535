//! Mesh builder: detect → cluster → estimate width → homogenize.
//!
//! Edge detection runs on the border-cropped, alpha-masked luminance of the
//! input. Line coordinates found there are shifted back by the margin, so the
//! returned mesh always indexes the image passed in. The image borders are
//! pinned on both axes because the line detector never reports them; interior
//! lines within the cluster threshold of a border merge into it.
use super::{cluster_lines, get_pixel_width, homogenize_lines, Mesh};
use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::edges::{canny, close};
use crate::error::{Error, Result};
use crate::image::ops::{crop_border, masked_luminance, nearest_upscale};
use crate::params::MeshParams;
use crate::segments::{detect_segments, Orientation};
use image::{GrayImage, RgbaImage};
use log::{debug, info};
use std::time::Instant;

/// Everything the builder produced on the way to a [`Mesh`].
#[derive(Clone, Debug)]
pub struct MeshBuild {
    pub mesh: Mesh,
    pub pixel_width: f64,
    /// Clustered line coordinates before homogenization, borders included.
    pub detected_x: Vec<u32>,
    pub detected_y: Vec<u32>,
    /// Segments returned by the line detector, all orientations.
    pub segment_count: usize,
    /// Canny output on the border-cropped image.
    pub edges: GrayImage,
    /// `edges` after morphological closing.
    pub closed_edges: GrayImage,
    pub timings: TimingBreakdown,
}

impl MeshBuild {
    /// No interior line was detected on either axis. The mesh is then only a
    /// guess from the image aspect ratio and callers should retry or fall
    /// back.
    pub fn is_degenerate(&self) -> bool {
        self.detected_x.len() <= 2 && self.detected_y.len() <= 2
    }
}

/// A mesh built on a nearest-upscaled copy of the input, together with that
/// copy (the image the mesh indexes).
#[derive(Clone, Debug)]
pub struct ScaledMesh {
    pub build: MeshBuild,
    pub image: RgbaImage,
    pub factor: u32,
}

/// Mesh coordinates for `image`.
pub fn compute_mesh(image: &RgbaImage, params: &MeshParams) -> Result<Mesh> {
    build_mesh(image, params).map(|b| b.mesh)
}

/// Upscale `image` by `factor` (nearest neighbour) and build the mesh there.
/// Sharp upscaled steps survive Canny better on small sprites.
pub fn compute_mesh_with_scaling(
    image: &RgbaImage,
    factor: u32,
    params: &MeshParams,
) -> Result<ScaledMesh> {
    if factor == 0 {
        return Err(Error::invalid_parameter("upsample_factor", "must be >= 1"));
    }
    let scaled = if factor == 1 {
        image.clone()
    } else {
        nearest_upscale(image, factor)
    };
    let build = build_mesh(&scaled, params)?;
    Ok(ScaledMesh {
        build,
        image: scaled,
        factor,
    })
}

/// Run the full mesh builder and keep every intermediate product.
pub fn build_mesh(image: &RgbaImage, params: &MeshParams) -> Result<MeshBuild> {
    let (w, h) = image.dimensions();
    if w < 2 || h < 2 {
        return Err(Error::invalid_parameter(
            "image",
            format!("{w}x{h} is too small to carry a mesh"),
        ));
    }
    let total = Instant::now();
    let mut timings = TimingBreakdown::default();

    let stage = Instant::now();
    let m = params.border_margin;
    let margin = if w > 2 * m && h > 2 * m { m } else { 0 };
    let cropped = crop_border(image, margin);
    let luma = masked_luminance(&cropped, params.alpha_threshold);
    timings.lap("prepare", stage);

    let stage = Instant::now();
    let edges = canny(&luma, &params.canny);
    timings.lap("canny", stage);

    let stage = Instant::now();
    let closed_edges = close(&edges, params.closure_kernel_size);
    timings.lap("close", stage);

    let stage = Instant::now();
    let segments = detect_segments(&closed_edges, &params.hough);
    timings.lap("hough", stage);

    let stage = Instant::now();
    let mut raw_x = Vec::new();
    let mut raw_y = Vec::new();
    for seg in &segments {
        let [mx, my] = seg.midpoint();
        match seg.orientation(params.hough.angle_threshold_deg) {
            Orientation::Vertical => raw_x.push(mx.max(0) as u32 + margin),
            Orientation::Horizontal => raw_y.push(my.max(0) as u32 + margin),
            Orientation::Diagonal => {}
        }
    }
    let detected_x = anchor_borders(&raw_x, w - 1, params.cluster_threshold);
    let detected_y = anchor_borders(&raw_y, h - 1, params.cluster_threshold);
    timings.lap("cluster", stage);

    let stage = Instant::now();
    let pixel_width = get_pixel_width(&detected_x, &detected_y, params.trim_fraction)?;
    let mesh_x = homogenize_lines(&detected_x, pixel_width, params.gap_policy)?;
    let mesh_y = homogenize_lines(&detected_y, pixel_width, params.gap_policy)?;
    let mesh = Mesh::new(mesh_x, mesh_y)?;
    timings.lap("homogenize", stage);
    timings.total_ms = elapsed_ms(total);

    debug!(
        "mesh {}x{}: {} segments, detected {}x{} lines",
        w,
        h,
        segments.len(),
        detected_x.len(),
        detected_y.len()
    );
    info!(
        "mesh {}x{} cells, pixel width {:.2} ({:.1} ms)",
        mesh.cells_x(),
        mesh.cells_y(),
        pixel_width,
        timings.total_ms
    );

    Ok(MeshBuild {
        mesh,
        pixel_width,
        detected_x,
        detected_y,
        segment_count: segments.len(),
        edges,
        closed_edges,
        timings,
    })
}

/// Cluster interior detections and pin the borders `0` and `last`.
///
/// Clusters within `threshold` of a border are absorbed by it, so the border
/// coordinates never move and an axis always carries at least two lines.
fn anchor_borders(raw: &[u32], last: u32, threshold: u32) -> Vec<u32> {
    let mut lines = vec![0];
    lines.extend(
        cluster_lines(raw, threshold)
            .into_iter()
            .filter(|&v| v > threshold && v.saturating_add(threshold) < last),
    );
    lines.push(last);
    lines
}
