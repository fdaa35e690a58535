//! Crate-wide error type.
//!
//! Degenerate inputs (no detectable lines, fully transparent images) are not
//! errors: the affected stages return a valid but degenerate value and the
//! caller decides whether to retry. Everything in here is a hard failure.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image shapes differ: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (u32, u32),
        right: (u32, u32),
    },

    #[error("region {region:?} lies outside a {width}x{height} image")]
    RegionOutOfBounds {
        region: (u32, u32, u32, u32),
        width: u32,
        height: u32,
    },

    #[error("at least two line coordinates are required, got {0}")]
    EmptyLines(usize),

    #[error("pixel width must be finite and positive, got {0}")]
    InvalidPixelWidth(f64),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("color count must be within 1..=256, got {0}")]
    InvalidColorCount(usize),

    #[error("scale search evaluated no candidate for a {width}x{height} image")]
    NoScaleCandidate { width: u32, height: u32 },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
