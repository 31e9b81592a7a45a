use crate::error::CoreError;
use crate::frame::{DecodedImage, FrameSequence};

/// What a decoder hands to the conversion core.
///
/// The caller, not the core, decides which of the two an input is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// A single picture.
    Still(DecodedImage),
    /// An animation.
    Animated(FrameSequence),
}

/// Transforme des octets bruts en [`Input`].
///
/// Implémenté par : `SniffingDecoder` (crate `ac-source`).
///
/// # Example
/// ```
/// use ac_core::traits::{Decode, Input};
/// use ac_core::frame::DecodedImage;
/// use ac_core::CoreError;
///
/// struct Blank;
/// impl Decode for Blank {
///     fn decode(&self, _bytes: &[u8]) -> Result<Input, CoreError> {
///         Ok(Input::Still(DecodedImage::new(1, 1)))
///     }
///     fn name(&self) -> &'static str { "blank" }
/// }
/// assert!(matches!(Blank.decode(&[]), Ok(Input::Still(_))));
/// ```
pub trait Decode: Send + Sync {
    /// Decode `bytes`.
    ///
    /// # Errors
    /// [`CoreError::Decode`] for undecodable bytes,
    /// [`CoreError::UnsupportedInput`] for formats the decoder refuses.
    fn decode(&self, bytes: &[u8]) -> Result<Input, CoreError>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
