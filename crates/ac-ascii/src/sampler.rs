use ac_core::color::Rgb;
use ac_core::frame::{DecodedImage, Grid};

use crate::dither::BinaryImage;

/// Échantillon d'une cellule ASCII : luminance + couleur source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampleCell {
    /// Luma BT.601.
    pub luminance: u8,
    /// Source color.
    pub rgb: Rgb,
}

impl SampleCell {
    /// Negative image of the sample: luminance and every channel inverted.
    ///
    /// # Example
    /// ```
    /// use ac_ascii::sampler::SampleCell;
    /// use ac_core::color::Rgb;
    /// let cell = SampleCell { luminance: 10, rgb: Rgb(0, 100, 255) };
    /// assert_eq!(cell.negated(), SampleCell { luminance: 245, rgb: Rgb(255, 155, 0) });
    /// assert_eq!(cell.negated().negated(), cell);
    /// ```
    #[inline]
    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            luminance: 255 - self.luminance,
            rgb: self.rgb.inverted(),
        }
    }
}

/// Bloc Braille 2×4 : `dots[row][col]`, plus la couleur moyenne du bloc.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DotCell {
    /// On/off state, 4 rows of 2 columns.
    pub dots: [[bool; 2]; 4],
    /// Mean color of the 8 source pixels.
    pub rgb: Rgb,
    /// Mean luma of the 8 source pixels.
    pub luminance: u8,
}

impl DotCell {
    /// Every dot toggled, color and luminance inverted.
    #[inline]
    #[must_use]
    pub fn negated(self) -> Self {
        let mut dots = self.dots;
        for row in &mut dots {
            for dot in row {
                *dot = !*dot;
            }
        }
        Self {
            dots,
            rgb: self.rgb.inverted(),
            luminance: 255 - self.luminance,
        }
    }

    /// Lit dot count.
    #[must_use]
    pub fn count_on(&self) -> usize {
        self.dots.iter().flatten().filter(|&&d| d).count()
    }
}

/// Où la valeur allumée/éteinte d'un point est lue.
#[derive(Clone, Copy, Debug)]
pub enum DotSource<'a> {
    /// `luminance >= threshold`.
    Threshold(u8),
    /// Bits from an error-diffused image of the same size.
    Dithered(&'a BinaryImage),
}

/// One sample per pixel: the image is already at character-grid size.
///
/// Runs on the calling thread; parallelism lives at the frame level.
///
/// # Example
/// ```
/// use ac_ascii::sampler::sample_cells;
/// use ac_core::color::Rgb;
/// use ac_core::frame::DecodedImage;
/// let grid = sample_cells(&DecodedImage::filled(3, 2, Rgb::gray(50)));
/// assert_eq!((grid.width, grid.height), (3, 2));
/// assert_eq!(grid.get(2, 1).luminance, 50);
/// ```
#[must_use]
pub fn sample_cells(img: &DecodedImage) -> Grid<SampleCell> {
    let (w, h) = (img.width as usize, img.height as usize);
    let mut grid = Grid::new(w, h, SampleCell::default());
    if w == 0 {
        return grid;
    }
    for (y, row) in grid.cells.chunks_exact_mut(w).enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            let rgb = img.rgb(x as u32, y as u32);
            *cell = SampleCell {
                luminance: rgb.luma(),
                rgb,
            };
        }
    }
    grid
}

/// Group the image into 2×4 blocks, one [`DotCell`] per character.
///
/// `img` must be `cols × 2` by `rows × 4` pixels, and a dithered source must
/// have the same size. Missing pixels read as black.
///
/// # Example
/// ```
/// use ac_ascii::sampler::{sample_dots, DotSource};
/// use ac_core::color::Rgb;
/// use ac_core::frame::DecodedImage;
/// let grid = sample_dots(&DecodedImage::filled(4, 4, Rgb::WHITE), 2, 1, DotSource::Threshold(128));
/// assert_eq!(grid.get(1, 0).count_on(), 8);
/// ```
#[must_use]
pub fn sample_dots(img: &DecodedImage, cols: usize, rows: usize, source: DotSource<'_>) -> Grid<DotCell> {
    let mut grid = Grid::new(cols, rows, DotCell::default());
    if cols == 0 {
        return grid;
    }
    for (cy, row) in grid.cells.chunks_exact_mut(cols).enumerate() {
        for (cx, cell) in row.iter_mut().enumerate() {
            *cell = sample_block(img, cx as u32 * 2, cy as u32 * 4, source);
        }
    }
    grid
}

#[allow(clippy::cast_possible_truncation)]
fn sample_block(img: &DecodedImage, x0: u32, y0: u32, source: DotSource<'_>) -> DotCell {
    let mut dots = [[false; 2]; 4];
    let (mut r, mut g, mut b, mut lum) = (0u32, 0u32, 0u32, 0u32);
    for (dy, row) in dots.iter_mut().enumerate() {
        for (dx, dot) in row.iter_mut().enumerate() {
            let (x, y) = (x0 + dx as u32, y0 + dy as u32);
            let rgb = if x < img.width && y < img.height {
                img.rgb(x, y)
            } else {
                Rgb::default()
            };
            let l = rgb.luma();
            *dot = match source {
                DotSource::Threshold(t) => l >= t,
                DotSource::Dithered(bits) => bits.get(x, y),
            };
            r += u32::from(rgb.0);
            g += u32::from(rgb.1);
            b += u32::from(rgb.2);
            lum += u32::from(l);
        }
    }
    DotCell {
        dots,
        rgb: Rgb((r / 8) as u8, (g / 8) as u8, (b / 8) as u8),
        luminance: (lum / 8) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_and_half() -> DecodedImage {
        // Left column black, right column white.
        let mut img = DecodedImage::filled(2, 4, Rgb(0, 0, 0));
        for y in 0..4 {
            img.set_rgb(1, y, Rgb::WHITE);
        }
        img
    }

    #[test]
    fn threshold_is_inclusive() {
        let img = DecodedImage::filled(2, 4, Rgb::gray(128));
        assert_eq!(sample_dots(&img, 1, 1, DotSource::Threshold(128)).get(0, 0).count_on(), 8);
        assert_eq!(sample_dots(&img, 1, 1, DotSource::Threshold(129)).get(0, 0).count_on(), 0);
    }

    #[test]
    fn block_color_is_the_mean() {
        let cell = *sample_dots(&half_and_half(), 1, 1, DotSource::Threshold(128)).get(0, 0);
        assert_eq!(cell.rgb, Rgb::gray(127));
        assert_eq!(cell.dots, [[false, true]; 4]);
    }

    #[test]
    fn dithered_bits_replace_the_threshold() {
        let img = DecodedImage::filled(2, 4, Rgb::WHITE);
        let mut bits = BinaryImage::new(2, 4);
        bits.set(0, 3, true);
        let cell = *sample_dots(&img, 1, 1, DotSource::Dithered(&bits)).get(0, 0);
        assert_eq!(cell.count_on(), 1);
        assert!(cell.dots[3][0]);
    }

    #[test]
    fn negation_is_an_involution() {
        let cell = *sample_dots(&half_and_half(), 1, 1, DotSource::Threshold(128)).get(0, 0);
        assert_eq!(cell.negated().dots, [[true, false]; 4]);
        assert_eq!(cell.negated().negated(), cell);
    }

    #[test]
    fn cells_follow_row_major_order() {
        let mut img = DecodedImage::filled(2, 2, Rgb(0, 0, 0));
        img.set_rgb(1, 0, Rgb::WHITE);
        let grid = sample_cells(&img);
        let lums: Vec<u8> = grid.cells.iter().map(|c| c.luminance).collect();
        assert_eq!(lums, vec![0, 255, 0, 0]);
    }
}
