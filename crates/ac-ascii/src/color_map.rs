use ac_core::color::{Rgb, ansi256_to_rgb, rgb_to_ansi256};
use ac_core::config::{ColorLevel, ColorMode, RenderConfig};

/// Reduce `rgb` to what the terminal color level can show.
///
/// 24-bit is lossless. 8-bit goes through the nearest palette index and back
/// to that index's canonical RGB, so structured output still carries a triple.
///
/// # Example
/// ```
/// use ac_ascii::color_map::quantize;
/// use ac_core::color::Rgb;
/// use ac_core::config::ColorLevel;
/// assert_eq!(quantize(Rgb(1, 2, 3), ColorLevel::TrueColor), Rgb(1, 2, 3));
/// assert_eq!(quantize(Rgb(250, 130, 10), ColorLevel::Ansi256), Rgb(255, 135, 0));
/// ```
#[must_use]
pub fn quantize(rgb: Rgb, level: ColorLevel) -> Rgb {
    match level {
        ColorLevel::TrueColor => rgb,
        ColorLevel::Ansi256 => ansi256_to_rgb(rgb_to_ansi256(rgb)),
    }
}

/// Choose the color of one cell, before quantization.
///
/// Priority: source color, then grayscale, then the fixed font color, then
/// nothing.
///
/// # Example
/// ```
/// use ac_ascii::color_map::resolve_color;
/// use ac_core::color::Rgb;
/// use ac_core::config::ColorMode;
/// let red = Rgb(200, 0, 0);
/// assert_eq!(resolve_color(ColorMode::Original, None, red, 60), Some(red));
/// assert_eq!(resolve_color(ColorMode::Grayscale, None, red, 60), Some(Rgb::gray(60)));
/// assert_eq!(resolve_color(ColorMode::None, Some(Rgb(0, 0, 255)), red, 60), Some(Rgb(0, 0, 255)));
/// assert_eq!(resolve_color(ColorMode::None, None, red, 60), None);
/// ```
#[must_use]
pub fn resolve_color(mode: ColorMode, font: Option<Rgb>, rgb: Rgb, luminance: u8) -> Option<Rgb> {
    match mode {
        ColorMode::Original => Some(rgb),
        ColorMode::Grayscale => Some(Rgb::gray(luminance)),
        ColorMode::None => font,
    }
}

/// Résolution + quantification, figées pour une conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorResolver {
    mode: ColorMode,
    font: Option<Rgb>,
    level: ColorLevel,
}

impl ColorResolver {
    /// Snapshot the color settings of `config`.
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            mode: config.color_mode,
            font: config.explicit_font_color(),
            level: config.color_level,
        }
    }

    /// Final color of a cell, `None` for a plain glyph.
    #[inline]
    #[must_use]
    pub fn resolve(&self, rgb: Rgb, luminance: u8) -> Option<Rgb> {
        resolve_color(self.mode, self.font, rgb, luminance).map(|c| quantize(c, self.level))
    }
}

#[cfg(test)]
mod tests {
    use ac_core::color::MAX_CUBE_DEVIATION;

    use super::*;

    #[test]
    fn ansi256_stays_within_palette_deviation() {
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(17) {
                let src = Rgb(r, g, 255 - r);
                let out = quantize(src, ColorLevel::Ansi256);
                for (a, b) in [(src.0, out.0), (src.1, out.1), (src.2, out.2)] {
                    assert!(a.abs_diff(b) <= MAX_CUBE_DEVIATION, "{src:?} -> {out:?}");
                }
            }
        }
    }

    #[test]
    fn truecolor_is_lossless() {
        for v in 0..=255u8 {
            let c = Rgb(v, v.wrapping_mul(7), v.wrapping_add(91));
            assert_eq!(quantize(c, ColorLevel::TrueColor), c);
        }
    }

    #[test]
    fn original_wins_over_font_color() {
        let config = RenderConfig {
            color_mode: ColorMode::Original,
            font_color: Rgb(0, 255, 0),
            ..RenderConfig::default()
        };
        let resolver = ColorResolver::new(&config);
        assert_eq!(resolver.resolve(Rgb(9, 9, 9), 9), Some(Rgb(9, 9, 9)));
    }

    #[test]
    fn white_font_color_means_no_color() {
        let resolver = ColorResolver::new(&RenderConfig::default());
        assert_eq!(resolver.resolve(Rgb(9, 9, 9), 9), None);
    }

    #[test]
    fn grayscale_is_quantized_too() {
        let config = RenderConfig {
            color_mode: ColorMode::Grayscale,
            color_level: ColorLevel::Ansi256,
            ..RenderConfig::default()
        };
        let resolver = ColorResolver::new(&config);
        assert_eq!(resolver.resolve(Rgb(0, 0, 0), 100), Some(Rgb::gray(95)));
    }
}
