//! Straight-line segments and the probabilistic Hough detector that finds
//! them in a binary edge map.
//!
//! Only axis-aligned segments matter downstream: the mesh builder classifies
//! each segment with [`LineSegment::orientation`] and keeps the midpoint
//! coordinate of horizontal and vertical ones.

mod hough;
mod segment;

pub use hough::detect_segments;
pub use segment::{LineSegment, Orientation};
