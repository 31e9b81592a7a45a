use ac_core::config::RenderConfig;
use ac_core::error::CoreError;
use ac_core::frame::{DecodedImage, Grid};

use crate::dither::floyd_steinberg;
use crate::mapper::{GlyphMapper, RenderedGlyph};
use crate::orient::orient;
use crate::sampler::{DotSource, sample_cells, sample_dots};

/// Compositor : enchaîne tramage → échantillonnage → miroir → glyphes.
///
/// Works on an image already resampled to the target size (`cols × rows`
/// pixels, or `cols·2 × rows·4` in Braille mode). Holds no per-frame state
/// and can be shared by reference.
///
/// # Example
/// ```
/// use ac_ascii::compositor::Compositor;
/// use ac_core::color::Rgb;
/// use ac_core::config::RenderConfig;
/// use ac_core::frame::DecodedImage;
///
/// let compositor = Compositor::new(&RenderConfig::default()).unwrap();
/// let grid = compositor.process(&DecodedImage::filled(3, 2, Rgb::WHITE));
/// assert_eq!((grid.width, grid.height), (3, 2));
/// assert!(grid.cells.iter().all(|g| g.ch == '@'));
/// ```
#[derive(Clone, Debug)]
pub struct Compositor {
    mapper: GlyphMapper,
    braille: bool,
    dither: bool,
    threshold: u8,
    flip_x: bool,
    flip_y: bool,
}

impl Compositor {
    /// Capture the per-frame settings of `config`.
    ///
    /// # Errors
    /// [`CoreError::EmptyRamp`] for an empty custom ramp.
    pub fn new(config: &RenderConfig) -> Result<Self, CoreError> {
        let compositor = Self {
            mapper: GlyphMapper::new(config)?,
            braille: config.glyphs.is_braille(),
            dither: config.dither,
            threshold: config.threshold,
            flip_x: config.flip_x,
            flip_y: config.flip_y,
        };
        log::debug!(
            "compositor: braille={} dither={} threshold={} flip=({}, {})",
            compositor.braille,
            compositor.dither,
            compositor.threshold,
            compositor.flip_x,
            compositor.flip_y
        );
        Ok(compositor)
    }

    /// Convert one resampled image into its glyph grid.
    #[must_use]
    pub fn process(&self, img: &DecodedImage) -> Grid<RenderedGlyph> {
        if self.braille {
            let cols = (img.width / 2) as usize;
            let rows = (img.height / 4) as usize;
            let bits = self.dither.then(|| floyd_steinberg(img));
            let source = match &bits {
                Some(bits) => DotSource::Dithered(bits),
                None => DotSource::Threshold(self.threshold),
            };
            let mut dots = sample_dots(img, cols, rows, source);
            orient(&mut dots, self.flip_x, self.flip_y);
            self.mapper.map_dot_grid(dots)
        } else {
            let mut cells = sample_cells(img);
            orient(&mut cells, self.flip_x, self.flip_y);
            self.mapper.map_sample_grid(cells)
        }
    }
}

#[cfg(test)]
mod tests {
    use ac_core::color::Rgb;
    use ac_core::config::{ColorMode, GlyphSet};

    use super::*;

    fn gradient(w: u32, h: u32) -> DecodedImage {
        let mut img = DecodedImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set_rgb(x, y, Rgb::gray(((x + y * w) * 255 / (w * h - 1)) as u8));
            }
        }
        img
    }

    #[test]
    fn braille_grid_is_not_scaled() {
        let config = RenderConfig {
            glyphs: GlyphSet::Braille,
            ..RenderConfig::default()
        };
        let grid = Compositor::new(&config).unwrap().process(&gradient(6, 8));
        assert_eq!((grid.width, grid.height), (3, 2));
    }

    #[test]
    fn dithering_suppresses_the_threshold() {
        let img = DecodedImage::filled(4, 4, Rgb::gray(200));
        let thresholded = RenderConfig {
            glyphs: GlyphSet::Braille,
            threshold: 255,
            ..RenderConfig::default()
        };
        let blank = Compositor::new(&thresholded).unwrap().process(&img);
        assert!(blank.cells.iter().all(|g| g.ch == '\u{2800}'));

        let dithered = RenderConfig {
            dither: true,
            ..thresholded
        };
        let lit = Compositor::new(&dithered).unwrap().process(&img);
        assert!(lit.cells.iter().any(|g| g.ch != '\u{2800}'));
    }

    #[test]
    fn flip_x_mirrors_the_glyph_rows() {
        let img = gradient(4, 1);
        let plain = Compositor::new(&RenderConfig::default()).unwrap().process(&img);
        let flipped = Compositor::new(&RenderConfig {
            flip_x: true,
            ..RenderConfig::default()
        })
        .unwrap()
        .process(&img);
        let mut expected = plain.cells.clone();
        expected.reverse();
        assert_eq!(flipped.cells, expected);
    }

    #[test]
    fn colors_follow_their_cells_through_flips() {
        let mut img = DecodedImage::filled(2, 1, Rgb(255, 0, 0));
        img.set_rgb(1, 0, Rgb(0, 0, 255));
        let config = RenderConfig {
            color_mode: ColorMode::Original,
            flip_x: true,
            ..RenderConfig::default()
        };
        let grid = Compositor::new(&config).unwrap().process(&img);
        assert_eq!(grid.get(0, 0).color, Some(Rgb(0, 0, 255)));
        assert_eq!(grid.get(1, 0).color, Some(Rgb(255, 0, 0)));
    }
}
