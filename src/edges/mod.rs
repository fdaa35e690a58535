//! Edge processing: Sobel gradients, the Canny detector and binary closing.
//!
//! - `grad`: 3×3 Sobel gradients with clamped borders.
//! - `canny`: non-maximum suppression plus double-threshold hysteresis,
//!   producing a binary `GrayImage` (255 on edges).
//! - `morph`: rectangular morphological closing that bridges short breaks in
//!   the edge map before line detection.

pub mod canny;
pub mod grad;
pub mod morph;

pub use canny::{canny, non_maximum_suppression, EDGE};
pub use grad::{sobel_gradients, Grad, GradientNorm};
pub use morph::close;
