//! Output side of asciiconv.
//!
//! Flattens glyph grids to terminal text or JSON, runs the parallel frame
//! pipeline for animations and plays the result back.

pub mod flatten;
pub mod pipeline;
pub mod playback;

pub use pipeline::{
    FramePipeline, FrameRenderer, RenderedFrame, RenderedSequence, convert_image,
    convert_image_json, convert_image_text,
};
pub use playback::{Screen, TerminalScreen, play};
