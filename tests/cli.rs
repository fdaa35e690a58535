mod common;

use common::synthetic_image::{sprite_rgba, upscale_nearest};
use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pixel_mesh_cli_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn batch_continues_past_a_failing_input() {
    let dir = scratch_dir("batch");
    let good = dir.join("sprite.png");
    upscale_nearest(&sprite_rgba(8, 8), 8).save(&good).unwrap();
    let missing = dir.join("missing.png");
    let out_dir = dir.join("out");
    let report = dir.join("report.json");

    let status = Command::new(env!("CARGO_BIN_EXE_pixel-mesh"))
        .arg("-i")
        .arg(&missing)
        .arg(&good)
        .arg("-o")
        .arg(&out_dir)
        .arg("--report")
        .arg(&report)
        .status()
        .unwrap();

    assert!(!status.success(), "a failed input must fail the run");
    assert!(out_dir.join("sprite_pixelated.png").exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].get("error").is_some());
    assert!(entries[1].get("report").is_some());
}

#[test]
fn single_input_writes_the_named_file() {
    let dir = scratch_dir("single");
    let input = dir.join("in.png");
    upscale_nearest(&sprite_rgba(8, 8), 8).save(&input).unwrap();
    let output = dir.join("result.png");

    let status = Command::new(env!("CARGO_BIN_EXE_pixel-mesh"))
        .args(["-c", "16", "-p", "2", "--intermediates"])
        .arg(dir.join("debug"))
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(output.exists());
    for name in ["edges.png", "closed_edges.png", "lines.png", "mesh.png"] {
        assert!(dir.join("debug").join("in").join(name).exists(), "{name} missing");
    }
}

#[test]
fn color_count_is_range_checked() {
    let status = Command::new(env!("CARGO_BIN_EXE_pixel-mesh"))
        .args(["-i", "x.png", "-o", "y.png", "-c", "0"])
        .status()
        .unwrap();
    assert!(!status.success());
}
