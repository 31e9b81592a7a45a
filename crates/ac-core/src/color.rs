//! RGB triples and the xterm 256-color palette.
//!
//! Palette layout:
//! - 0..16    : system colors (terminal dependent, canonical xterm values here)
//! - 16..232  : 6×6×6 color cube, levels `0, 95, 135, 175, 215, 255`
//! - 232..256 : 24-step gray ramp, `8 + 10·n`

use serde::{Deserialize, Serialize};

/// Channel levels of the 6×6×6 cube.
pub const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Largest per-channel error introduced by [`rgb_to_ansi256`].
///
/// The widest gap between two cube levels is `0..95`; its midpoint sits 47
/// away from either end.
pub const MAX_CUBE_DEVIATION: u8 = 47;

const SYSTEM_COLORS: [Rgb; 16] = [
    Rgb(0, 0, 0),
    Rgb(128, 0, 0),
    Rgb(0, 128, 0),
    Rgb(128, 128, 0),
    Rgb(0, 0, 128),
    Rgb(128, 0, 128),
    Rgb(0, 128, 128),
    Rgb(192, 192, 192),
    Rgb(128, 128, 128),
    Rgb(255, 0, 0),
    Rgb(0, 255, 0),
    Rgb(255, 255, 0),
    Rgb(0, 0, 255),
    Rgb(255, 0, 255),
    Rgb(0, 255, 255),
    Rgb(255, 255, 255),
];

/// Couleur RGB 8 bits par canal. Sérialisée en `[r, g, b]`.
///
/// # Example
/// ```
/// use ac_core::color::Rgb;
/// let c = Rgb(10, 20, 30);
/// assert_eq!(c.inverted(), Rgb(245, 235, 225));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pure white. Also the "no explicit font color" sentinel.
    pub const WHITE: Self = Self(255, 255, 255);

    /// Gray with all three channels equal to `level`.
    #[inline(always)]
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self(level, level, level)
    }

    /// Channel-wise `255 - c`.
    #[inline(always)]
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self(255 - self.0, 255 - self.1, 255 - self.2)
    }

    /// Luma BT.601 en arithmétique entière (poids 0.299 / 0.587 / 0.114).
    ///
    /// # Example
    /// ```
    /// use ac_core::color::Rgb;
    /// assert_eq!(Rgb(255, 255, 255).luma(), 255);
    /// assert_eq!(Rgb(0, 0, 0).luma(), 0);
    /// assert_eq!(Rgb::gray(128).luma(), 128);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luma(self) -> u8 {
        let y = 19595 * u32::from(self.0) + 38470 * u32::from(self.1) + 7471 * u32::from(self.2);
        ((y + (1 << 15)) >> 16) as u8
    }
}

/// Nearest cube level for one channel. Ties go to the brighter level.
fn nearest_level(c: u8) -> u8 {
    for (i, pair) in CUBE_LEVELS.windows(2).enumerate() {
        let (lo, hi) = (pair[0], pair[1]);
        if c <= hi {
            return if c - lo < hi - c { i as u8 } else { i as u8 + 1 };
        }
    }
    5
}

/// Index of the cube color nearest to `rgb`.
///
/// # Example
/// ```
/// use ac_core::color::{rgb_to_ansi256, Rgb};
/// assert_eq!(rgb_to_ansi256(Rgb(255, 255, 255)), 231);
/// assert_eq!(rgb_to_ansi256(Rgb(255, 128, 0)), 208);
/// ```
#[must_use]
pub fn rgb_to_ansi256(rgb: Rgb) -> u8 {
    16 + 36 * nearest_level(rgb.0) + 6 * nearest_level(rgb.1) + nearest_level(rgb.2)
}

/// Canonical RGB representative of a 256-color palette index.
///
/// # Example
/// ```
/// use ac_core::color::{ansi256_to_rgb, Rgb};
/// assert_eq!(ansi256_to_rgb(42), Rgb(0, 215, 135));
/// assert_eq!(ansi256_to_rgb(232), Rgb(8, 8, 8));
/// ```
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> Rgb {
    match index {
        0..=15 => SYSTEM_COLORS[index as usize],
        16..=231 => {
            let i = index - 16;
            Rgb(
                CUBE_LEVELS[(i / 36) as usize],
                CUBE_LEVELS[(i / 6 % 6) as usize],
                CUBE_LEVELS[(i % 6) as usize],
            )
        }
        _ => Rgb::gray(8 + 10 * (index - 232)),
    }
}
