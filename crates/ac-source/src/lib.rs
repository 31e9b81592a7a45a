//! Input side of asciiconv: decoding collaborators and the resampler.

pub mod image;
pub mod resize;

pub use crate::image::SniffingDecoder;
pub use crate::resize::{Resizer, grid_size, target_size};
