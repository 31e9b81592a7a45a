//! Configuration, types, and shared structures for asciiconv.
//!
//! This crate contains the pixel and grid types, the 256-color palette, the
//! glyph ramps and the configuration shared by every stage of a conversion.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::LuminanceLut;
pub use color::Rgb;
pub use config::RenderConfig;
pub use error::CoreError;
pub use frame::{DecodedImage, FrameSequence, Grid};
pub use traits::{Decode, Input};
