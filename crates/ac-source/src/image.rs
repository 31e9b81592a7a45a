use std::io::Cursor;

use ac_core::error::CoreError;
use ac_core::frame::{DecodedImage, FrameSequence};
use ac_core::traits::{Decode, Input};
use ::image::ImageFormat;

/// Formats fixes reconnus en entrée (hors GIF animé).
const STILL_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::WebP,
    ImageFormat::Tiff,
];

/// Decode a still picture into RGBA.
///
/// # Errors
/// [`CoreError::Decode`] if the bytes are not a readable image.
///
/// # Example
/// ```
/// use ac_source::image::decode_still;
/// assert!(decode_still(b"not an image").is_err());
/// ```
pub fn decode_still(bytes: &[u8]) -> Result<DecodedImage, CoreError> {
    let img = ::image::load_from_memory(bytes).map_err(|e| CoreError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("decoded still image {width}x{height}");
    DecodedImage::from_rgba(width, height, rgba.into_raw())
}

/// Decode every GIF frame without compositing.
///
/// Each frame keeps its own visible rectangle so that sub-image placement can
/// be detected downstream. Delays are in centiseconds. The NETSCAPE loop
/// extension becomes the repeat count: infinite → 0, absent → 1 pass,
/// `n` → `n` passes.
///
/// # Errors
/// [`CoreError::Decode`] for malformed GIF data, [`CoreError::EmptySequence`]
/// for a GIF without frames.
pub fn decode_gif(bytes: &[u8]) -> Result<FrameSequence, CoreError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options
        .read_info(Cursor::new(bytes))
        .map_err(|e| CoreError::Decode(e.to_string()))?;

    let mut frames = Vec::new();
    let mut delays = Vec::new();
    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| CoreError::Decode(e.to_string()))?
    {
        let image = DecodedImage::from_rgba(
            u32::from(frame.width),
            u32::from(frame.height),
            frame.buffer.to_vec(),
        )?;
        frames.push(image);
        delays.push(frame.delay);
    }

    let repeat = match decoder.repeat() {
        gif::Repeat::Infinite => 0,
        gif::Repeat::Finite(0) => 1,
        gif::Repeat::Finite(n) => u32::from(n),
    };
    log::info!("decoded GIF: {} frames, repeat={repeat}", frames.len());
    FrameSequence::new(frames, delays, repeat)
}

/// Décodeur qui choisit entre image fixe et séquence selon le contenu.
///
/// GIF → [`Input::Animated`]; PNG, JPEG, BMP, WebP, TIFF → [`Input::Still`];
/// anything else is refused.
///
/// # Example
/// ```
/// use ac_core::traits::Decode;
/// use ac_source::image::SniffingDecoder;
/// let err = SniffingDecoder.decode(b"plain text").unwrap_err();
/// assert!(err.is_unsupported_input());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SniffingDecoder;

impl Decode for SniffingDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Input, CoreError> {
        let format = ::image::guess_format(bytes).map_err(|_| {
            CoreError::UnsupportedInput(
                "file type could not be determined, input may be malformed or unsupported".into(),
            )
        })?;
        match format {
            ImageFormat::Gif => decode_gif(bytes).map(Input::Animated),
            f if STILL_FORMATS.contains(&f) => decode_still(bytes).map(Input::Still),
            other => Err(CoreError::UnsupportedInput(format!(
                "{other:?} input is not supported"
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "sniffing"
    }
}
