mod common;

use common::synthetic_image::checkerboard_rgba;
use pixel_mesh::mesh::{build_mesh, cluster_lines, get_pixel_width, homogenize_lines};
use pixel_mesh::params::{GapPolicy, MeshParams};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn checkerboard_mesh_has_ten_pixel_spacing() {
    init_logging();
    let img = checkerboard_rgba(200, 200, 10);
    let build = build_mesh(&img, &MeshParams::default()).expect("mesh build");

    assert!(!build.is_degenerate(), "no lines found: {:?}", build.detected_x);
    assert!((build.pixel_width - 10.0).abs() <= 1.0, "pixel width {}", build.pixel_width);

    for lines in [build.mesh.lines_x(), build.mesh.lines_y()] {
        assert_eq!(lines.first(), Some(&0));
        assert_eq!(lines.last(), Some(&199));
        assert_eq!(lines.len(), 21, "unexpected line count: {lines:?}");
        for pair in lines.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((9..=11).contains(&gap), "gap {gap} in {lines:?}");
        }
    }
}

#[test]
fn detected_lines_land_on_the_cell_boundaries() {
    init_logging();
    let img = checkerboard_rgba(200, 200, 10);
    let build = build_mesh(&img, &MeshParams::default()).expect("mesh build");
    // Interior boundaries sit between 10k - 1 and 10k.
    for &x in &build.detected_x[1..build.detected_x.len() - 1] {
        let r = (x + 1) % 10;
        assert!(r <= 1 || r == 9, "line {x} is off the grid");
    }
}

#[test]
fn missing_lines_are_filled_from_the_pixel_width() {
    // Detections with a few lines missing and one near-duplicate.
    let raw_x = [0, 10, 11, 20, 50, 60, 99];
    let raw_y = [0, 10, 20, 30, 40, 49];
    let xs = cluster_lines(&raw_x, 4);
    let ys = cluster_lines(&raw_y, 4);
    assert_eq!(xs, vec![0, 10, 20, 50, 60, 99]);

    let width = get_pixel_width(&xs, &ys, 0.2).unwrap();
    assert_eq!(width, 10.0);

    let mesh_x = homogenize_lines(&xs, width, GapPolicy::Collapse).unwrap();
    assert_eq!(mesh_x, vec![0, 10, 20, 30, 40, 50, 60, 69, 79, 89, 99]);
}
