use thiserror::Error;

/// Errors originating from the conversion core.
///
/// Variants fall in three families, see [`CoreError::is_configuration`] and
/// [`CoreError::is_unsupported_input`]. Everything else is a failure reported
/// by the resampler and is propagated as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Width and height were both set without using an explicit pair.
    #[error("both width and height can't be set, use dimensions instead")]
    ConflictingSize,

    /// No sizing information at all.
    #[error("either dimensions, width, or height must be set")]
    MissingSize,

    /// Invalid width/height dimensions.
    #[error("invalid dimensions: {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A custom ramp with no glyph in it.
    #[error("custom ramp must contain at least one character")]
    EmptyRamp,

    /// Color depth other than 8 or 24 bits.
    #[error("{0}-bit color level is unsupported")]
    UnsupportedColorLevel(u8),

    /// JSON/grid output requested for an animated input.
    #[error("structured output is not supported for frame sequences")]
    StructuredSequence,

    /// Input bytes that cannot be handled at all.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Frame sequence without frames.
    #[error("frame sequence is empty")]
    EmptySequence,

    /// One delay per frame is required.
    #[error("frame sequence has {frames} frames but {delays} delays")]
    DelayCountMismatch {
        /// Number of frames.
        frames: usize,
        /// Number of delays.
        delays: usize,
    },

    /// A later frame whose visible region differs from the first one.
    #[error(
        "frame {index} is {width}×{height} but the first frame is {expected_width}×{expected_height}: \
         sub-image placement is not supported"
    )]
    FrameSizeMismatch {
        /// Index of the offending frame.
        index: usize,
        /// Its width.
        width: u32,
        /// Its height.
        height: u32,
        /// Width of frame 0.
        expected_width: u32,
        /// Height of frame 0.
        expected_height: u32,
    },

    /// Bytes the decoder recognized but could not read.
    #[error("can't decode input: {0}")]
    Decode(String),

    /// The resampler failed.
    #[error("resize failed: {0}")]
    Resize(String),
}

impl CoreError {
    /// `true` for errors caused by the configuration rather than the input.
    ///
    /// # Example
    /// ```
    /// use ac_core::CoreError;
    /// assert!(CoreError::ConflictingSize.is_configuration());
    /// assert!(!CoreError::EmptySequence.is_configuration());
    /// ```
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::ConflictingSize
                | Self::MissingSize
                | Self::InvalidDimensions { .. }
                | Self::EmptyRamp
                | Self::UnsupportedColorLevel(_)
                | Self::StructuredSequence
        )
    }

    /// `true` for inputs the core refuses to convert, undecodable bytes
    /// included.
    #[must_use]
    pub fn is_unsupported_input(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedInput(_)
                | Self::Decode(_)
                | Self::EmptySequence
                | Self::DelayCountMismatch { .. }
                | Self::FrameSizeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_disjoint() {
        let all = [
            CoreError::Config("x".into()),
            CoreError::ConflictingSize,
            CoreError::MissingSize,
            CoreError::InvalidDimensions {
                width: 0,
                height: 1,
            },
            CoreError::EmptyRamp,
            CoreError::UnsupportedColorLevel(4),
            CoreError::StructuredSequence,
            CoreError::UnsupportedInput("x".into()),
            CoreError::EmptySequence,
            CoreError::DelayCountMismatch {
                frames: 2,
                delays: 1,
            },
            CoreError::FrameSizeMismatch {
                index: 1,
                width: 1,
                height: 1,
                expected_width: 2,
                expected_height: 2,
            },
            CoreError::Decode("x".into()),
            CoreError::Resize("x".into()),
        ];
        for err in &all {
            assert!(
                !(err.is_configuration() && err.is_unsupported_input()),
                "{err} is in both families"
            );
        }
    }

    #[test]
    fn decode_failures_are_unsupported_input() {
        let err = CoreError::Decode("unexpected end of file".into());
        assert!(err.is_unsupported_input());
        assert!(!err.is_configuration());
        assert!(!CoreError::Resize("x".into()).is_unsupported_input());
    }

    #[test]
    fn color_level_message_names_the_depth() {
        assert_eq!(
            CoreError::UnsupportedColorLevel(4).to_string(),
            "4-bit color level is unsupported"
        );
    }
}
