//! Tramage Floyd–Steinberg en noir et blanc.
//!
//! The error of each pixel is pushed to its unvisited neighbours:
//! ```text
//!         *    7/16
//! 3/16  5/16  1/16
//! ```

use ac_core::color::Rgb;
use ac_core::frame::DecodedImage;

/// Image binaire : un bit allumé par pixel blanc.
///
/// # Example
/// ```
/// use ac_ascii::dither::BinaryImage;
/// let mut img = BinaryImage::new(2, 1);
/// img.set(1, 0, true);
/// assert!(!img.get(0, 0));
/// assert!(img.get(1, 0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryImage {
    bits: Vec<bool>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BinaryImage {
    /// All-off image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bits: vec![false; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Bit at (x, y). Out of bounds reads as off.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Set the bit at (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if x < self.width && y < self.height {
            self.bits[y as usize * self.width as usize + x as usize] = on;
        }
    }

    /// Number of lit pixels.
    #[must_use]
    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Diffuse the luma of `img` onto a black/white palette.
///
/// # Example
/// ```
/// use ac_ascii::dither::floyd_steinberg;
/// use ac_core::color::Rgb;
/// use ac_core::frame::DecodedImage;
/// let bits = floyd_steinberg(&DecodedImage::filled(4, 4, Rgb::WHITE));
/// assert_eq!(bits.count_on(), 16);
/// ```
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
#[must_use]
pub fn floyd_steinberg(img: &DecodedImage) -> BinaryImage {
    let (w, h) = (img.width as usize, img.height as usize);
    let mut out = BinaryImage::new(img.width, img.height);
    if w == 0 || h == 0 {
        return out;
    }

    // Luma ×16 pour garder les fractions de l'erreur en entier.
    let mut acc: Vec<i32> = img
        .data
        .chunks_exact(4)
        .map(|px| i32::from(Rgb(px[0], px[1], px[2]).luma()) * 16)
        .collect();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let old = acc[i].clamp(0, 255 * 16);
            let on = old >= 128 * 16;
            out.bits[i] = on;
            let err = old - if on { 255 * 16 } else { 0 };

            if x + 1 < w {
                acc[i + 1] += err * 7 / 16;
            }
            if y + 1 < h {
                let below = i + w;
                if x > 0 {
                    acc[below - 1] += err * 3 / 16;
                }
                acc[below] += err * 5 / 16;
                if x + 1 < w {
                    acc[below + 1] += err / 16;
                }
            }
        }
    }
    log::trace!("dithered {w}x{h}: {} dots on", out.count_on());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_stays_black() {
        let bits = floyd_steinberg(&DecodedImage::filled(5, 3, Rgb(0, 0, 0)));
        assert_eq!(bits.count_on(), 0);
    }

    #[test]
    fn mid_gray_lights_about_half() {
        let bits = floyd_steinberg(&DecodedImage::filled(16, 16, Rgb::gray(128)));
        let on = bits.count_on();
        assert!((100..=156).contains(&on), "{on} of 256 lit");
    }

    #[test]
    fn density_follows_brightness() {
        let dark = floyd_steinberg(&DecodedImage::filled(16, 16, Rgb::gray(60))).count_on();
        let light = floyd_steinberg(&DecodedImage::filled(16, 16, Rgb::gray(200))).count_on();
        assert!(dark < light);
    }

    #[test]
    fn deterministic() {
        let img = DecodedImage::filled(7, 5, Rgb(90, 140, 30));
        assert_eq!(floyd_steinberg(&img), floyd_steinberg(&img));
    }
}
