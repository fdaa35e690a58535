//! Image containers and helpers shared by every stage.
//!
//! - [`ImageF32`]: owned single-channel float buffer used for luminance and
//!   gradient maps.
//! - [`ops`]: RGBA/RGB conversions, integer resampling, cropping, flood fill
//!   and grid overlays on top of `image` buffers.
//! - [`io`]: loading/saving images and JSON reports.

pub mod f32;
pub mod io;
pub mod ops;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut};
