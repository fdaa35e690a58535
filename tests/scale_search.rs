mod common;

use common::synthetic_image::{sprite_rgba, upscale_nearest};
use pixel_mesh::params::ScaleSearchParams;
use pixel_mesh::scale_search::{compute_mse, estimate_scale_and_offset};
use pixel_mesh::Error;

#[test]
fn nearest_upscaled_sprite_recovers_scale_four() {
    let sprite = sprite_rgba(8, 8);
    let big = upscale_nearest(&sprite, 4);

    let est = estimate_scale_and_offset(&big, &ScaleSearchParams::default()).unwrap();
    assert_eq!(est.scale, 4);
    assert_eq!(est.offset, (0, 0));
    assert!(est.mse < 1e-9, "mse {}", est.mse);
    assert_eq!(est.image, sprite);
}

#[test]
fn candidate_cap_still_returns_the_best_scored() {
    let sprite = sprite_rgba(6, 6);
    let big = upscale_nearest(&sprite, 5);
    // Only scale 3 candidates (9 of them) are scored.
    let params = ScaleSearchParams {
        max_candidates: Some(9),
        ..ScaleSearchParams::default()
    };
    let est = estimate_scale_and_offset(&big, &params).unwrap();
    assert_eq!(est.scale, 3);
    assert_eq!(est.candidates, 9);
    assert!(est.mse > 0.0);
}

#[test]
fn mismatched_shapes_are_an_error_not_infinity() {
    let a = sprite_rgba(4, 4);
    let b = sprite_rgba(4, 3);
    assert!(matches!(
        compute_mse(&a, &b),
        Err(Error::ShapeMismatch { .. })
    ));
}
