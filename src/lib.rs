#![doc = include_str!("../README.md")]

// Pipeline surface
pub mod cells;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod mesh;
pub mod palette;
pub mod params;
pub mod pipeline;
pub mod scale_search;

// Building blocks used by the mesh builder; public for tooling and tests.
pub mod edges;
pub mod period;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

pub use crate::cells::{downsample, make_background_transparent};
pub use crate::error::{Error, Result};
pub use crate::mesh::{compute_mesh, compute_mesh_with_scaling, Mesh};
pub use crate::palette::{palette_img, PalettedImage};
pub use crate::params::PipelineParams;
pub use crate::pipeline::{pixelate, PixelateResult};
pub use crate::scale_search::{estimate_scale_and_offset, ScaleEstimate};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use pixel_mesh::prelude::*;
///
/// # fn main() -> pixel_mesh::Result<()> {
/// let img = pixel_mesh::image::io::load_rgba_image("sprite.png".as_ref())?;
/// let result = pixelate(&img, &PipelineParams::default())?;
/// println!("{}x{} via {:?}", result.image.width(), result.image.height(), result.method);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::params::{MeshParams, PaletteParams, PipelineParams, ScaleSearchParams};
    pub use crate::{compute_mesh, downsample, palette_img, pixelate, Mesh};
}
