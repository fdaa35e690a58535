use super::TimingBreakdown;
use crate::mesh::MeshBuild;
use crate::period::PeriodEstimate;
use crate::scale_search::ScaleEstimate;
use serde::Serialize;

/// Which path produced the final image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelateMethod {
    /// A non-degenerate mesh at the given upsample factor.
    Mesh { upsample_factor: u32 },
    /// Integer scale/offset search.
    ScaleSearch,
    /// Nothing better was available; the aspect-ratio guess was used.
    DegenerateMesh { upsample_factor: u32 },
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
}

/// One mesh build attempt.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshAttempt {
    pub upsample_factor: u32,
    pub segments: usize,
    pub detected_x: Vec<u32>,
    pub detected_y: Vec<u32>,
    pub pixel_width: f64,
    pub cells_x: u32,
    pub cells_y: u32,
    pub degenerate: bool,
    pub timings: TimingBreakdown,
}

impl MeshAttempt {
    pub fn from_build(upsample_factor: u32, build: &MeshBuild) -> Self {
        Self {
            upsample_factor,
            segments: build.segment_count,
            detected_x: build.detected_x.clone(),
            detected_y: build.detected_y.clone(),
            pixel_width: build.pixel_width,
            cells_x: build.mesh.cells_x(),
            cells_y: build.mesh.cells_y(),
            degenerate: build.is_degenerate(),
            timings: build.timings.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSearchStage {
    pub scale: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub mse: f64,
    pub evaluated: usize,
    pub candidates: usize,
}

impl From<&ScaleEstimate> for ScaleSearchStage {
    fn from(est: &ScaleEstimate) -> Self {
        Self {
            scale: est.scale,
            offset_x: est.offset.0,
            offset_y: est.offset.1,
            mse: est.mse,
            evaluated: est.evaluated,
            candidates: est.candidates,
        }
    }
}

/// Serializable trace of a single `pixelate` run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelateReport {
    pub input: ImageDescriptor,
    pub output: ImageDescriptor,
    pub method: PixelateMethod,
    pub attempts: Vec<MeshAttempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_search: Option<ScaleSearchStage>,
    pub palette_colors: usize,
    pub period: PeriodEstimate,
    pub timings: TimingBreakdown,
}
