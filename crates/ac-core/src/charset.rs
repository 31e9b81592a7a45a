/// 10 caractères : rampe par défaut, du plus sombre au plus clair.
pub const RAMP_DEFAULT: &str = " .:-=+*#%@";

/// 69 caractères, Paul Bourke, rampe "complex".
pub const RAMP_COMPLEX: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Lookup table mapping luminance [0..255] → ramp glyph.
///
/// Index rule: `floor(lum / 255 × len)`, with 255 pinned to the last glyph.
/// Pre-computed once per conversion for O(1) per-cell cost.
///
/// # Example
/// ```
/// use ac_core::charset::LuminanceLut;
/// let lut = LuminanceLut::new(" .:#@").unwrap();
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '@');
/// ```
#[derive(Clone, Debug)]
pub struct LuminanceLut {
    lut: [char; 256],
}

impl LuminanceLut {
    /// Build a LUT from a ramp ordered darkest→lightest.
    ///
    /// Returns `None` for an empty ramp. A single-glyph ramp maps everything
    /// to that glyph.
    #[must_use]
    pub fn new(ramp: &str) -> Option<Self> {
        let chars: Vec<char> = ramp.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let len = chars.len();
        let mut lut = [' '; 256];
        for (lum, slot) in lut.iter_mut().enumerate() {
            let idx = (lum * len / 255).min(len - 1);
            *slot = chars[idx];
        }
        Some(Self { lut })
    }

    /// Map a luminance value [0..255] to a glyph.
    ///
    /// # Example
    /// ```
    /// use ac_core::charset::{LuminanceLut, RAMP_DEFAULT};
    /// let lut = LuminanceLut::new(RAMP_DEFAULT).unwrap();
    /// assert_eq!(lut.map(128), '+');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }
}
