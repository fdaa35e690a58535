use clap::{ArgAction, Parser};
use log::{error, info};
use pixel_mesh::config::{load_config, RuntimeConfig};
use pixel_mesh::diagnostics::PixelateReport;
use pixel_mesh::image::io::{load_rgba_image, save_rgba, write_json_file};
use pixel_mesh::pipeline::{pixelate, write_intermediates};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "pixel-mesh", version)]
#[command(about = "Recover true-resolution pixel art from upscaled or noisy images")]
struct Args {
    /// Input image path(s)
    #[arg(short, long = "input", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output file (single input) or directory
    #[arg(short, long)]
    output: PathBuf,

    /// Palette size
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=256))]
    colors: Option<u16>,

    /// Upscale the result by this factor for display
    #[arg(short, long)]
    pixel_size: Option<u32>,

    /// Upscale the input by this factor before mesh detection
    #[arg(short, long)]
    upsample: Option<u32>,

    /// Flood fill the background from the corners with transparency
    #[arg(short, long)]
    transparent: bool,

    /// JSON runtime config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for edge/line/mesh debug images
    #[arg(long)]
    intermediates: Option<PathBuf>,

    /// Write a JSON report for all inputs
    #[arg(long)]
    report: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportEntry {
    input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<PixelateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!("{failed} input(s) failed");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Process every input; returns how many failed.
fn run(args: Args) -> pixel_mesh::Result<usize> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RuntimeConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let batch = args.inputs.len() > 1 || args.output.is_dir() || args.output.extension().is_none();
    let mut entries = Vec::with_capacity(args.inputs.len());
    let mut failed = 0usize;
    for input in &args.inputs {
        let output = output_path(&args.output, input, batch);
        match process_one(input, &output, &config) {
            Ok(report) => entries.push(ReportEntry {
                input: input.clone(),
                output: Some(output),
                report: Some(report),
                error: None,
            }),
            Err(err) => {
                error!("{}: {err}", input.display());
                failed += 1;
                entries.push(ReportEntry {
                    input: input.clone(),
                    output: None,
                    report: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &entries)?;
        info!("report written to {}", path.display());
    }
    Ok(failed)
}

fn apply_overrides(config: &mut RuntimeConfig, args: &Args) {
    let params = &mut config.params;
    if let Some(colors) = args.colors {
        params.palette.num_colors = colors as usize;
    }
    if let Some(pixel_size) = args.pixel_size {
        params.pixel_size = pixel_size;
    }
    if let Some(upsample) = args.upsample {
        params.upsample_factor = upsample;
    }
    if args.transparent {
        params.transparent_background = true;
    }
    if args.intermediates.is_some() {
        config.output.intermediates_dir = args.intermediates.clone();
    }
    if args.report.is_some() {
        config.output.report_json = args.report.clone();
    }
}

fn output_path(output: &Path, input: &Path, batch: bool) -> PathBuf {
    if !batch {
        return output.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    output.join(format!("{stem}_pixelated.png"))
}

fn process_one(
    input: &Path,
    output: &Path,
    config: &RuntimeConfig,
) -> pixel_mesh::Result<PixelateReport> {
    let img = load_rgba_image(input)?;
    let result = pixelate(&img, &config.params)?;

    if let (Some(dir), Some(mesh)) = (&config.output.intermediates_dir, &result.mesh) {
        let stem = input.file_stem().unwrap_or_default();
        write_intermediates(&dir.join(stem), mesh)?;
    }
    save_rgba(&result.image, output)?;

    let report = result.report;
    let pixel_width = report
        .attempts
        .last()
        .map(|a| a.pixel_width)
        .unwrap_or_default();
    info!(
        "{} -> {} ({}x{}, pixel width {:.2}, edge period {:?}/{:?})",
        input.display(),
        output.display(),
        report.output.width,
        report.output.height,
        pixel_width,
        report.period.period_x,
        report.period.period_y
    );
    Ok(report)
}
