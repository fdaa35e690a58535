//! Parameter types configuring every stage of the pipeline.
//!
//! All knobs live here instead of being buried as default arguments so a run
//! can be reproduced from a single serialized [`PipelineParams`]. Defaults
//! mirror the values that work well on AI-generated sprites upscaled by 2×
//! before mesh detection.
//!
//! For tuning, start with the Canny thresholds and the closure kernel: the
//! kernel must stay smaller than the (upscaled) pixel size or neighbouring
//! grid lines get fused.

use serde::{Deserialize, Serialize};

/// Hysteresis thresholds for the Canny detector, in L1 Sobel units on a
/// 0..255 luminance image.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 200.0,
        }
    }
}

/// Probabilistic Hough line detector settings.
///
/// - `rho`: distance resolution of the accumulator (pixels).
/// - `theta_deg`: angular resolution of the accumulator (degrees).
/// - `vote_threshold`: minimum accumulator votes before a line is walked.
/// - `min_length`: segments shorter than this are dropped (pixels).
/// - `max_gap`: largest run of missing pixels bridged inside one segment.
/// - `angle_threshold_deg`: tolerance around 0° / 90° for a segment to count
///   as horizontal / vertical; anything else is discarded.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    pub rho: f32,
    pub theta_deg: f32,
    pub vote_threshold: u32,
    pub min_length: u32,
    pub max_gap: u32,
    pub angle_threshold_deg: f32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta_deg: 1.0,
            vote_threshold: 100,
            min_length: 50,
            max_gap: 10,
            angle_threshold_deg: 15.0,
        }
    }
}

/// What `homogenize_lines` does with a gap that rounds to zero subdivisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Merge the tiny gap into its neighbour by dropping one interior line.
    #[default]
    Collapse,
    /// Keep every detected line; a tiny gap becomes one (narrow) cell.
    Preserve,
}

/// Mesh builder configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshParams {
    /// Pixels cropped from every side before edge detection.
    pub border_margin: u32,
    /// Pixels with alpha below this are treated as background (luminance 0).
    pub alpha_threshold: u8,
    pub canny: CannyParams,
    /// Side of the square structuring element used for closing.
    pub closure_kernel_size: u32,
    pub hough: HoughParams,
    /// Chained-clustering distance for merging near-duplicate lines.
    pub cluster_threshold: u32,
    /// Fraction trimmed from each end of the gap distribution.
    pub trim_fraction: f64,
    pub gap_policy: GapPolicy,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            border_margin: 2,
            alpha_threshold: 128,
            canny: CannyParams::default(),
            closure_kernel_size: 8,
            hough: HoughParams::default(),
            cluster_threshold: 4,
            trim_fraction: 0.2,
            gap_policy: GapPolicy::Collapse,
        }
    }
}

/// Scale/offset search bounds.
///
/// Offsets are searched on `[0, min(scale - 1, max_offset)]` per axis.
/// `max_candidates` and `time_budget_ms` bound the otherwise unbounded
/// brute force; a capped search reports how many candidates it scored.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSearchParams {
    pub min_scale: u32,
    pub max_scale: u32,
    pub max_offset: u32,
    pub max_candidates: Option<usize>,
    pub time_budget_ms: Option<u64>,
}

impl Default for ScaleSearchParams {
    fn default() -> Self {
        Self {
            min_scale: 3,
            max_scale: 100,
            max_offset: 3,
            max_candidates: None,
            time_budget_ms: Some(30_000),
        }
    }
}

/// Palette reduction settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteParams {
    pub num_colors: usize,
    /// Pixels with alpha below this are painted black before quantization.
    pub alpha_threshold: u8,
}

impl Default for PaletteParams {
    fn default() -> Self {
        Self {
            num_colors: 16,
            alpha_threshold: 128,
        }
    }
}

/// Edge-profile period estimation settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodParams {
    /// Normalized Sobel magnitude (0..1) above which a pixel counts as edge.
    pub edge_threshold: f32,
    /// Shortest period considered, in pixels.
    pub min_period: usize,
}

impl Default for PeriodParams {
    fn default() -> Self {
        Self {
            edge_threshold: 0.5,
            min_period: 2,
        }
    }
}

/// Pipeline-wide parameters controlling the end-to-end pixelation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Nearest-neighbour upscale applied before mesh detection (>= 1).
    pub upsample_factor: u32,
    /// Final nearest-neighbour upscale of the result, for display (>= 1).
    pub pixel_size: u32,
    /// Flood fill the four corners of the result with transparency.
    pub transparent_background: bool,
    /// Fall back to the scale/offset search when no mesh can be found.
    pub scale_search_fallback: bool,
    pub mesh: MeshParams,
    pub palette: PaletteParams,
    pub scale_search: ScaleSearchParams,
    pub period: PeriodParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            upsample_factor: 2,
            pixel_size: 1,
            transparent_background: false,
            scale_search_fallback: true,
            mesh: MeshParams::default(),
            palette: PaletteParams::default(),
            scale_search: ScaleSearchParams::default(),
            period: PeriodParams::default(),
        }
    }
}
