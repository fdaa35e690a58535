//! End-to-end pixelation driver.
//!
//! Stages
//! - Mesh at `upsample_factor`; when degenerate, once more at factor 1.
//! - Still degenerate: integer scale/offset search (if enabled).
//! - Palette reduction on the image the chosen mesh indexes, then one output
//!   pixel per mesh cell.
//! - Optional corner flood fill to transparency and display upscale.
use crate::cells::{downsample, make_background_transparent};
use crate::diagnostics::{
    elapsed_ms, ImageDescriptor, MeshAttempt, PixelateMethod, PixelateReport, ScaleSearchStage,
    TimingBreakdown,
};
use crate::error::{Error, Result};
use crate::image::io::{save_gray, save_rgba};
use crate::image::ops::{nearest_upscale, overlay_grid_lines};
use crate::mesh::{compute_mesh_with_scaling, ScaledMesh};
use crate::palette::palette_img;
use crate::params::PipelineParams;
use crate::period::estimate_period;
use crate::scale_search::{estimate_scale_and_offset, ScaleEstimate};
use image::{Rgba, RgbaImage};
use log::{info, warn};
use std::path::Path;
use std::time::Instant;

const OVERLAY_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Output of [`pixelate`].
#[derive(Clone, Debug)]
pub struct PixelateResult {
    pub image: RgbaImage,
    pub method: PixelateMethod,
    /// Last mesh attempt (the one used unless the scale search won).
    pub mesh: Option<ScaledMesh>,
    pub scale: Option<ScaleEstimate>,
    pub report: PixelateReport,
}

/// Recover the native-resolution pixel art behind `image`.
pub fn pixelate(image: &RgbaImage, params: &PipelineParams) -> Result<PixelateResult> {
    if params.upsample_factor == 0 {
        return Err(Error::invalid_parameter("upsample_factor", "must be >= 1"));
    }
    if params.pixel_size == 0 {
        return Err(Error::invalid_parameter("pixel_size", "must be >= 1"));
    }
    let total = Instant::now();
    let mut timings = TimingBreakdown::default();

    let mut factors = vec![params.upsample_factor];
    if params.upsample_factor != 1 {
        factors.push(1);
    }

    let mut attempts = Vec::new();
    let mut mesh: Option<ScaledMesh> = None;
    for factor in factors {
        let stage = Instant::now();
        let scaled = compute_mesh_with_scaling(image, factor, &params.mesh)?;
        timings.lap(format!("mesh@{factor}x"), stage);
        attempts.push(MeshAttempt::from_build(factor, &scaled.build));

        let degenerate = scaled.build.is_degenerate();
        mesh = Some(scaled);
        if !degenerate {
            break;
        }
        info!("no grid lines detected at {factor}x upsample");
    }
    let mesh_found = mesh.as_ref().is_some_and(|m| !m.build.is_degenerate());

    let mut scale = None;
    if !mesh_found && params.scale_search_fallback {
        let stage = Instant::now();
        match estimate_scale_and_offset(image, &params.scale_search) {
            Ok(est) => scale = Some(est),
            Err(Error::NoScaleCandidate { .. }) => {
                warn!("scale search had no candidates; keeping the degenerate mesh")
            }
            Err(e) => return Err(e),
        }
        timings.lap("scale_search", stage);
    }

    let stage = Instant::now();
    let (mut out, method, palette_colors) = match (&scale, &mesh) {
        (Some(est), _) => {
            let paletted = palette_img(&est.image, &params.palette)?;
            let rgb = paletted.to_rgb_image();
            let mut out = RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                Rgba([r, g, b, 255])
            });
            if params.transparent_background {
                make_background_transparent(&mut out);
            }
            (out, PixelateMethod::ScaleSearch, paletted.palette.len())
        }
        (None, Some(scaled)) => {
            let paletted = palette_img(&scaled.image, &params.palette)?;
            let out = downsample(
                &paletted.to_rgb_image(),
                &scaled.build.mesh,
                params.transparent_background,
            )?;
            let method = if mesh_found {
                PixelateMethod::Mesh {
                    upsample_factor: scaled.factor,
                }
            } else {
                PixelateMethod::DegenerateMesh {
                    upsample_factor: scaled.factor,
                }
            };
            (out, method, paletted.palette.len())
        }
        (None, None) => {
            return Err(Error::InvalidMesh("no mesh attempt was made".into()));
        }
    };
    timings.lap("quantize", stage);

    if params.pixel_size > 1 {
        out = scale_img(&out, params.pixel_size)?;
    }

    let stage = Instant::now();
    let period = estimate_period(image, params.mesh.alpha_threshold, &params.period);
    timings.lap("period", stage);
    timings.total_ms = elapsed_ms(total);

    info!(
        "pixelated {}x{} -> {}x{} via {:?} ({:.1} ms)",
        image.width(),
        image.height(),
        out.width(),
        out.height(),
        method,
        timings.total_ms
    );

    let report = PixelateReport {
        input: ImageDescriptor {
            width: image.width(),
            height: image.height(),
        },
        output: ImageDescriptor {
            width: out.width(),
            height: out.height(),
        },
        method,
        attempts,
        scale_search: scale.as_ref().map(ScaleSearchStage::from),
        palette_colors,
        period,
        timings,
    };

    Ok(PixelateResult {
        image: out,
        method,
        mesh,
        scale,
        report,
    })
}

/// Nearest-neighbour upscale for display; every cell becomes
/// `pixel_size × pixel_size` pixels.
pub fn scale_img(image: &RgbaImage, pixel_size: u32) -> Result<RgbaImage> {
    if pixel_size == 0 {
        return Err(Error::invalid_parameter("pixel_size", "must be >= 1"));
    }
    Ok(nearest_upscale(image, pixel_size))
}

/// Write `edges.png`, `closed_edges.png`, `lines.png` (detected lines) and
/// `mesh.png` (completed mesh) for a mesh attempt into `dir`.
pub fn write_intermediates(dir: &Path, mesh: &ScaledMesh) -> Result<()> {
    let build = &mesh.build;
    save_gray(&build.edges, &dir.join("edges.png"))?;
    save_gray(&build.closed_edges, &dir.join("closed_edges.png"))?;
    let lines = overlay_grid_lines(
        &mesh.image,
        &build.detected_x,
        &build.detected_y,
        OVERLAY_COLOR,
    );
    save_rgba(&lines, &dir.join("lines.png"))?;
    let full = overlay_grid_lines(
        &mesh.image,
        build.mesh.lines_x(),
        build.mesh.lines_y(),
        OVERLAY_COLOR,
    );
    save_rgba(&full, &dir.join("mesh.png"))?;
    Ok(())
}
