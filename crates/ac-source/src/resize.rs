use ac_core::config::Sizing;
use ac_core::error::CoreError;
use ac_core::frame::DecodedImage;
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};

/// Facteur de compensation vertical : une cellule est environ deux fois plus haute que large.
const CELL_HEIGHT_FACTOR: f64 = 0.5;
/// Compensation horizontale symétrique pour le dimensionnement par hauteur.
const CELL_WIDTH_FACTOR: f64 = 2.0;

/// Braille cell = 2 dots wide.
pub const BRAILLE_DOTS_X: u32 = 2;
/// Braille cell = 4 dots tall.
pub const BRAILLE_DOTS_Y: u32 = 4;

/// Character-grid dimensions for a source of `src_width × src_height` pixels.
///
/// Width-only: `h = trunc(trunc(w / ar) × 0.5)`; height-only:
/// `w = trunc(trunc(h × ar) × 2)`, where `ar = src_width / src_height`.
/// Derived sides never drop below 1. An explicit pair is returned unchanged.
///
/// # Example
/// ```
/// use ac_core::config::Sizing;
/// use ac_source::resize::grid_size;
/// assert_eq!(grid_size(Sizing::Width(80), 200, 100), (80, 20));
/// assert_eq!(grid_size(Sizing::Height(20), 200, 100), (80, 20));
/// assert_eq!(grid_size(Sizing::Exact(7, 3), 200, 100), (7, 3));
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn grid_size(sizing: Sizing, src_width: u32, src_height: u32) -> (u32, u32) {
    let aspect = f64::from(src_width.max(1)) / f64::from(src_height.max(1));
    match sizing {
        Sizing::Exact(w, h) => (w, h),
        Sizing::Width(w) => {
            let h = ((f64::from(w) / aspect).trunc() * CELL_HEIGHT_FACTOR).trunc();
            (w, (h as u32).max(1))
        }
        Sizing::Height(h) => {
            let w = ((f64::from(h) * aspect).trunc() * CELL_WIDTH_FACTOR).trunc();
            ((w as u32).max(1), h)
        }
    }
}

/// Pixel dimensions the image must be resampled to.
///
/// Same as [`grid_size`], scaled by 2×4 when every cell holds a Braille dot
/// block. The character grid itself keeps the [`grid_size`] dimensions.
///
/// # Errors
/// [`CoreError::InvalidDimensions`] if the Braille scaling overflows `u32`.
///
/// # Example
/// ```
/// use ac_core::config::Sizing;
/// use ac_source::resize::target_size;
/// assert_eq!(target_size(Sizing::Exact(10, 5), 1, 1, false), Ok((10, 5)));
/// assert_eq!(target_size(Sizing::Exact(10, 5), 1, 1, true), Ok((20, 20)));
/// ```
pub fn target_size(
    sizing: Sizing,
    src_width: u32,
    src_height: u32,
    braille: bool,
) -> Result<(u32, u32), CoreError> {
    let (w, h) = grid_size(sizing, src_width, src_height);
    if !braille {
        return Ok((w, h));
    }
    match (w.checked_mul(BRAILLE_DOTS_X), h.checked_mul(BRAILLE_DOTS_Y)) {
        (Some(pw), Some(ph)) => Ok((pw, ph)),
        _ => Err(CoreError::InvalidDimensions { width: w, height: h }),
    }
}

/// Resizer réutilisable wrappant `fast_image_resize` (Lanczos3).
///
/// One instance per worker: the scratch buffer and the convolution
/// coefficients cache are reused from frame to frame.
///
/// # Example
/// ```
/// use ac_core::frame::DecodedImage;
/// use ac_source::resize::Resizer;
/// let mut r = Resizer::new();
/// let out = r.resample(&DecodedImage::new(100, 100), 10, 5).unwrap();
/// assert_eq!(out.dimensions(), (10, 5));
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Copie de la source (l'API exige `&mut` sur le buffer source).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
            src_buf: Vec::new(),
        }
    }

    /// Resample `src` to `width × height` pixels.
    ///
    /// Equal dimensions short-circuit to a copy.
    ///
    /// # Errors
    /// [`CoreError::InvalidDimensions`] for a zero target side,
    /// [`CoreError::Resize`] if the resize backend fails.
    pub fn resample(
        &mut self,
        src: &DecodedImage,
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        if src.dimensions() == (width, height) {
            return Ok(src.clone());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);
        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .map_err(|e| CoreError::Resize(format!("source: {e}")))?;

        let mut dst = DecodedImage::new(width, height);
        let mut dst_image = Image::from_slice_u8(width, height, &mut dst.data, PixelType::U8x4)
            .map_err(|e| CoreError::Resize(format!("destination: {e}")))?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .map_err(|e| CoreError::Resize(e.to_string()))?;

        log::trace!("resampled {}x{} -> {width}x{height}", src.width, src.height);
        Ok(dst)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use ac_core::color::Rgb;

    use super::*;

    #[test]
    fn width_only_halves_the_derived_height() {
        // ar = 1.5 → trunc(100 / 1.5) = 66 → 33
        assert_eq!(grid_size(Sizing::Width(100), 300, 200), (100, 33));
    }

    #[test]
    fn height_only_doubles_the_derived_width() {
        // ar = 1.25 → trunc(10 × 1.25) = 12 → 24
        assert_eq!(grid_size(Sizing::Height(10), 500, 400), (24, 10));
    }

    #[test]
    fn derived_side_is_at_least_one() {
        assert_eq!(grid_size(Sizing::Width(1), 1000, 1), (1, 1));
        assert_eq!(grid_size(Sizing::Height(1), 1, 1000), (1, 1));
    }

    #[test]
    fn braille_scales_pixels_not_cells() {
        assert_eq!(grid_size(Sizing::Exact(3, 2), 9, 9), (3, 2));
        assert_eq!(target_size(Sizing::Exact(3, 2), 9, 9, true), Ok((6, 8)));
    }

    #[test]
    fn braille_scaling_overflow_is_an_error() {
        let huge = u32::MAX / 2 + 1;
        assert_eq!(
            target_size(Sizing::Exact(huge, 1), 1, 1, true),
            Err(CoreError::InvalidDimensions { width: huge, height: 1 })
        );
        assert_eq!(target_size(Sizing::Exact(huge, 1), 1, 1, false), Ok((huge, 1)));
    }

    #[test]
    fn same_size_is_a_copy() {
        let src = DecodedImage::filled(4, 4, Rgb(10, 20, 30));
        let out = Resizer::new().resample(&src, 4, 4).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let src = DecodedImage::filled(64, 32, Rgb(140, 140, 140));
        let out = Resizer::new().resample(&src, 8, 4).unwrap();
        for y in 0..4 {
            for x in 0..8 {
                let Rgb(r, g, b) = out.rgb(x, y);
                for c in [r, g, b] {
                    assert!(c.abs_diff(140) <= 1, "({x},{y}) = {c}");
                }
            }
        }
    }

    #[test]
    fn zero_target_is_rejected() {
        let src = DecodedImage::new(4, 4);
        assert!(matches!(
            Resizer::new().resample(&src, 0, 3),
            Err(CoreError::InvalidDimensions { width: 0, height: 3 })
        ));
    }
}
