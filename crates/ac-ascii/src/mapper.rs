use ac_core::charset::LuminanceLut;
use ac_core::color::Rgb;
use ac_core::config::RenderConfig;
use ac_core::error::CoreError;
use ac_core::frame::Grid;

use crate::braille::encode_braille;
use crate::color_map::ColorResolver;
use crate::sampler::{DotCell, SampleCell};

/// Glyphe final : caractère + couleur résolue (`None` sans mode couleur).
///
/// # Example
/// ```
/// use ac_ascii::mapper::RenderedGlyph;
/// let g = RenderedGlyph { ch: '#', color: None };
/// assert_eq!(g.ch, '#');
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderedGlyph {
    /// Displayed character.
    pub ch: char,
    /// Quantized color, already mapped back to RGB.
    pub color: Option<Rgb>,
}

/// Sample → glyph for one conversion.
///
/// The ramp LUT is built once. Negative mode inverts the sample (luminance,
/// color, Braille dots) before lookup, so applying it twice is a no-op.
///
/// # Example
/// ```
/// use ac_ascii::mapper::GlyphMapper;
/// use ac_ascii::sampler::SampleCell;
/// use ac_core::config::RenderConfig;
/// let mapper = GlyphMapper::new(&RenderConfig::default()).unwrap();
/// let glyph = mapper.map_sample(SampleCell { luminance: 255, ..Default::default() });
/// assert_eq!(glyph.ch, '@');
/// assert_eq!(glyph.color, None);
/// ```
#[derive(Clone, Debug)]
pub struct GlyphMapper {
    lut: Option<LuminanceLut>,
    negative: bool,
    colors: ColorResolver,
}

impl GlyphMapper {
    /// Build the mapper for `config`.
    ///
    /// # Errors
    /// [`CoreError::EmptyRamp`] for an empty custom ramp.
    pub fn new(config: &RenderConfig) -> Result<Self, CoreError> {
        let lut = match config.glyphs.ramp() {
            Some(ramp) => Some(LuminanceLut::new(ramp).ok_or(CoreError::EmptyRamp)?),
            None => None,
        };
        Ok(Self {
            lut,
            negative: config.negative,
            colors: ColorResolver::new(config),
        })
    }

    /// Map one ramp sample.
    #[inline]
    #[must_use]
    pub fn map_sample(&self, cell: SampleCell) -> RenderedGlyph {
        let cell = if self.negative { cell.negated() } else { cell };
        let ch = self.lut.as_ref().map_or(' ', |lut| lut.map(cell.luminance));
        RenderedGlyph {
            ch,
            color: self.colors.resolve(cell.rgb, cell.luminance),
        }
    }

    /// Map one Braille block.
    #[inline]
    #[must_use]
    pub fn map_dots(&self, cell: DotCell) -> RenderedGlyph {
        let cell = if self.negative { cell.negated() } else { cell };
        RenderedGlyph {
            ch: encode_braille(&cell.dots),
            color: self.colors.resolve(cell.rgb, cell.luminance),
        }
    }

    /// Map a whole sample grid, keeping its layout.
    #[must_use]
    pub fn map_sample_grid(&self, grid: Grid<SampleCell>) -> Grid<RenderedGlyph> {
        grid.map(|cell| self.map_sample(cell))
    }

    /// Map a whole Braille grid, keeping its layout.
    #[must_use]
    pub fn map_dot_grid(&self, grid: Grid<DotCell>) -> Grid<RenderedGlyph> {
        grid.map(|cell| self.map_dots(cell))
    }
}
