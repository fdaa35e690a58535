//! Serializable run diagnostics: stage timings and the per-image report
//! written by the binary's `--report` flag.

pub mod report;
pub mod timing;

pub use report::{
    ImageDescriptor, MeshAttempt, PixelateMethod, PixelateReport, ScaleSearchStage,
};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
