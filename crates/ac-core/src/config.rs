use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{RAMP_COMPLEX, RAMP_DEFAULT};
use crate::color::Rgb;
use crate::error::CoreError;

/// Configuration complète d'une conversion.
///
/// Validée une seule fois au début de la conversion, puis immuable : les
/// workers du pipeline en reçoivent chacun une copie.
///
/// # Example
/// ```
/// use ac_core::config::{RenderConfig, Sizing};
/// let config = RenderConfig { width: Some(80), ..RenderConfig::default() };
/// assert_eq!(config.sizing().unwrap(), Sizing::Width(80));
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderConfig {
    // === Dimensions ===
    /// Explicit `(width, height)` in characters.
    pub dimensions: Option<(u32, u32)>,
    /// Width in characters, height derived from the aspect ratio.
    pub width: Option<u32>,
    /// Height in characters, width derived from the aspect ratio.
    pub height: Option<u32>,

    // === Glyphes ===
    /// Rampe ou Braille.
    pub glyphs: GlyphSet,
    /// Invert glyph selection and colors.
    pub negative: bool,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    /// Braille dot threshold on luminance. Ignored when `dither` is set.
    pub threshold: u8,
    /// Floyd–Steinberg dithering before Braille sampling.
    pub dither: bool,

    // === Couleur ===
    /// Which color, if any, travels with each glyph.
    pub color_mode: ColorMode,
    /// Foreground or background escape sequence.
    pub color_placement: ColorPlacement,
    /// Fixed glyph color. [`Rgb::WHITE`] means "unset".
    pub font_color: Rgb,
    /// Terminal color depth.
    pub color_level: ColorLevel,

    // === Pipeline ===
    /// Worker threads for frame sequences. `None` = available parallelism.
    pub workers: Option<usize>,
    /// How frames are fed to the workers.
    pub schedule: Schedule,
}

/// How the character dimensions are obtained.
///
/// # Example
/// ```
/// use ac_core::config::Sizing;
/// assert_ne!(Sizing::Width(10), Sizing::Height(10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sizing {
    /// Width fixed, height from aspect ratio.
    Width(u32),
    /// Height fixed, width from aspect ratio.
    Height(u32),
    /// Both fixed.
    Exact(u32, u32),
}

/// Glyph source.
///
/// # Example
/// ```
/// use ac_core::config::GlyphSet;
/// assert_eq!(GlyphSet::default().ramp(), Some(" .:-=+*#%@"));
/// assert_eq!(GlyphSet::Braille.ramp(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum GlyphSet {
    /// 10-glyph ramp.
    #[default]
    Default,
    /// 69-glyph ramp.
    Complex,
    /// Caller-supplied ramp, darkest first, used verbatim.
    Custom(String),
    /// Unicode Braille patterns, 2×4 dots per cell.
    Braille,
}

impl GlyphSet {
    /// The ramp string, or `None` in Braille mode.
    #[must_use]
    pub fn ramp(&self) -> Option<&str> {
        match self {
            Self::Default => Some(RAMP_DEFAULT),
            Self::Complex => Some(RAMP_COMPLEX),
            Self::Custom(ramp) => Some(ramp),
            Self::Braille => None,
        }
    }

    /// `true` for Braille output.
    #[must_use]
    pub fn is_braille(&self) -> bool {
        matches!(self, Self::Braille)
    }
}

/// Color carried by each glyph.
///
/// # Example
/// ```
/// use ac_core::config::ColorMode;
/// assert!(matches!(ColorMode::default(), ColorMode::None));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorMode {
    /// Plain glyphs (unless a font color is set).
    #[default]
    None,
    /// Source pixel color.
    Original,
    /// Luminance replicated on the three channels.
    Grayscale,
}

/// Where the resolved color is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorPlacement {
    /// Glyph color.
    #[default]
    Foreground,
    /// Cell background color.
    Background,
}

/// Terminal color depth. Serialized as its bit count.
///
/// # Example
/// ```
/// use ac_core::config::ColorLevel;
/// assert_eq!(ColorLevel::try_from(8).unwrap(), ColorLevel::Ansi256);
/// assert!(ColorLevel::try_from(4).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ColorLevel {
    /// 24-bit direct RGB.
    #[default]
    TrueColor,
    /// 8-bit xterm palette.
    Ansi256,
}

impl TryFrom<u8> for ColorLevel {
    type Error = CoreError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            24 => Ok(Self::TrueColor),
            8 => Ok(Self::Ansi256),
            other => Err(CoreError::UnsupportedColorLevel(other)),
        }
    }
}

impl From<ColorLevel> for u8 {
    fn from(level: ColorLevel) -> Self {
        match level {
            ColorLevel::TrueColor => 24,
            ColorLevel::Ansi256 => 8,
        }
    }
}

/// Frame scheduling strategy for sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Schedule {
    /// Fixed pool fed from a queue, one task per frame.
    #[default]
    Pool,
    /// Batches of `workers` frames separated by a completion barrier.
    Batched,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dimensions: None,
            width: None,
            height: None,
            glyphs: GlyphSet::Default,
            negative: false,
            flip_x: false,
            flip_y: false,
            threshold: 128,
            dither: false,
            color_mode: ColorMode::None,
            color_placement: ColorPlacement::Foreground,
            font_color: Rgb::WHITE,
            color_level: ColorLevel::TrueColor,
            workers: None,
            schedule: Schedule::Pool,
        }
    }
}

impl RenderConfig {
    /// Resolve the sizing options. Exactly one must be set.
    ///
    /// # Errors
    /// [`CoreError::ConflictingSize`] when two or more are set,
    /// [`CoreError::MissingSize`] when none is, and
    /// [`CoreError::InvalidDimensions`] for a zero side.
    pub fn sizing(&self) -> Result<Sizing, CoreError> {
        let set = usize::from(self.dimensions.is_some())
            + usize::from(self.width.is_some())
            + usize::from(self.height.is_some());
        if set > 1 {
            return Err(CoreError::ConflictingSize);
        }
        let sizing = match (self.dimensions, self.width, self.height) {
            (Some((w, h)), _, _) => Sizing::Exact(w, h),
            (_, Some(w), _) => Sizing::Width(w),
            (_, _, Some(h)) => Sizing::Height(h),
            _ => return Err(CoreError::MissingSize),
        };
        match sizing {
            Sizing::Exact(w, h) if w == 0 || h == 0 => {
                Err(CoreError::InvalidDimensions { width: w, height: h })
            }
            Sizing::Width(0) => Err(CoreError::InvalidDimensions { width: 0, height: 0 }),
            Sizing::Height(0) => Err(CoreError::InvalidDimensions { width: 0, height: 0 }),
            ok => Ok(ok),
        }
    }

    /// Fixed glyph color, if one was configured.
    ///
    /// # Example
    /// ```
    /// use ac_core::color::Rgb;
    /// use ac_core::config::RenderConfig;
    /// assert_eq!(RenderConfig::default().explicit_font_color(), None);
    /// let config = RenderConfig { font_color: Rgb(0, 255, 0), ..RenderConfig::default() };
    /// assert_eq!(config.explicit_font_color(), Some(Rgb(0, 255, 0)));
    /// ```
    #[must_use]
    pub fn explicit_font_color(&self) -> Option<Rgb> {
        (self.font_color != Rgb::WHITE).then_some(self.font_color)
    }

    /// `true` when glyphs carry any color at all.
    ///
    /// # Example
    /// ```
    /// use ac_core::color::Rgb;
    /// use ac_core::config::{ColorMode, RenderConfig};
    /// assert!(!RenderConfig::default().is_colored());
    /// assert!(RenderConfig { color_mode: ColorMode::Grayscale, ..RenderConfig::default() }.is_colored());
    /// assert!(RenderConfig { font_color: Rgb(0, 255, 0), ..RenderConfig::default() }.is_colored());
    /// ```
    #[must_use]
    pub fn is_colored(&self) -> bool {
        self.color_mode != ColorMode::None || self.explicit_font_color().is_some()
    }

    /// One-shot check run before any conversion starts.
    ///
    /// # Errors
    /// Any sizing error, [`CoreError::EmptyRamp`] for an empty custom ramp, or
    /// [`CoreError::Config`] for a zero worker count.
    pub fn validate(&self) -> Result<(), CoreError> {
        let sizing = self.sizing()?;
        if self.glyphs.ramp().is_some_and(str::is_empty) {
            return Err(CoreError::EmptyRamp);
        }
        if self.workers == Some(0) {
            return Err(CoreError::Config("worker count must be at least 1".into()));
        }
        if self.is_colored() {
            log::debug!(
                "config ok: {sizing:?}, glyphs={:?}, color={:?}@{}bit",
                self.glyphs,
                self.color_mode,
                u8::from(self.color_level)
            );
        } else {
            log::debug!("config ok: {sizing:?}, glyphs={:?}, plain", self.glyphs);
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: RenderSection,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    dimensions: Option<(u32, u32)>,
    width: Option<u32>,
    height: Option<u32>,
    glyphs: Option<GlyphSet>,
    negative: Option<bool>,
    flip_x: Option<bool>,
    flip_y: Option<bool>,
    threshold: Option<u8>,
    dither: Option<bool>,
    color_mode: Option<ColorMode>,
    color_placement: Option<ColorPlacement>,
    font_color: Option<Rgb>,
    color_level: Option<ColorLevel>,
    workers: Option<usize>,
    schedule: Option<Schedule>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for a `[render]` section,
/// including an unsupported `color_level`.
///
/// # Example
/// ```
/// use ac_core::config::{parse_config, ColorLevel, GlyphSet};
/// let config = parse_config("[render]\nwidth = 40\nglyphs = \"Braille\"\ncolor_level = 8\n").unwrap();
/// assert_eq!(config.width, Some(40));
/// assert_eq!(config.glyphs, GlyphSet::Braille);
/// assert_eq!(config.color_level, ColorLevel::Ansi256);
/// assert_eq!(config.threshold, 128);
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = RenderConfig::default();

    let r = file.render;
    if let Some(v) = r.dimensions {
        config.dimensions = Some(v);
    }
    if let Some(v) = r.width {
        config.width = Some(v);
    }
    if let Some(v) = r.height {
        config.height = Some(v);
    }
    if let Some(v) = r.glyphs {
        config.glyphs = v;
    }
    if let Some(v) = r.negative {
        config.negative = v;
    }
    if let Some(v) = r.flip_x {
        config.flip_x = v;
    }
    if let Some(v) = r.flip_y {
        config.flip_y = v;
    }
    if let Some(v) = r.threshold {
        config.threshold = v;
    }
    if let Some(v) = r.dither {
        config.dither = v;
    }
    if let Some(v) = r.color_mode {
        config.color_mode = v;
    }
    if let Some(v) = r.color_placement {
        config.color_placement = v;
    }
    if let Some(v) = r.font_color {
        config.font_color = v;
    }
    if let Some(v) = r.color_level {
        config.color_level = v;
    }
    if let Some(v) = r.workers {
        config.workers = Some(v);
    }
    if let Some(v) = r.schedule {
        config.schedule = v;
    }

    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ac_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("asciiconv.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}
