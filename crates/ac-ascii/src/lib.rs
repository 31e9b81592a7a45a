//! Glyph conversion engine for asciiconv.
//!
//! Turns a resampled pixel buffer into a grid of colored glyphs: optional
//! dithering, sampling, mirroring, then ramp or Braille mapping.

pub mod braille;
pub mod color_map;
pub mod compositor;
pub mod dither;
pub mod mapper;
pub mod orient;
pub mod sampler;

pub use compositor::Compositor;
pub use mapper::{GlyphMapper, RenderedGlyph};
