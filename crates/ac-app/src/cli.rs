use std::path::PathBuf;

use ac_core::color::Rgb;
use ac_core::config::{ColorLevel, ColorMode, ColorPlacement, GlyphSet, RenderConfig, Schedule};
use clap::{Parser, ValueEnum};

/// asciiconv : images et GIF animés en art ASCII / Braille dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image ou GIF à convertir, ou "-" pour lire l'entrée standard.
    #[arg(required_unless_present = "formats")]
    pub input: Option<String>,

    /// Display with the original colors (overrides --grayscale and --font-color).
    #[arg(short = 'C', long)]
    pub color: bool,

    /// Apply the color to the cell background instead of the glyph.
    #[arg(long)]
    pub color_bg: bool,

    /// Width and height in characters, e.g. -d 60,30.
    #[arg(short, long, value_parser = parse_pair, value_name = "W,H")]
    pub dimensions: Option<(u32, u32)>,

    /// Width in characters, height kept to the aspect ratio.
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Height in characters, width kept to the aspect ratio.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Custom ramp, darkest to lightest (overrides --complex).
    #[arg(short, long)]
    pub map: Option<String>,

    /// Use Braille patterns (overrides --complex and --map).
    #[arg(short, long)]
    pub braille: bool,

    /// Braille dot threshold, 0-255.
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Floyd–Steinberg dithering for Braille (ignores --threshold).
    #[arg(long)]
    pub dither: bool,

    /// Grayscale colors (overrides --font-color).
    #[arg(short, long)]
    pub grayscale: bool,

    /// Use the 69-glyph ramp.
    #[arg(short, long)]
    pub complex: bool,

    /// Negative image.
    #[arg(short, long)]
    pub negative: bool,

    /// Mirror horizontally.
    #[arg(short = 'x', long = "flipX")]
    pub flip_x: bool,

    /// Mirror vertically.
    #[arg(short = 'y', long = "flipY")]
    pub flip_y: bool,

    /// Print the glyph grid as JSON (single images only).
    #[arg(short = 'J', long)]
    pub json: bool,

    /// 8-bit (256) colors instead of 24-bit.
    #[arg(long = "256-color")]
    pub ansi256: bool,

    /// Fixed glyph color, e.g. --font-color 0,255,0.
    #[arg(long, value_parser = parse_rgb, value_name = "R,G,B")]
    pub font_color: Option<Rgb>,

    /// Fichier de configuration TOML (section [render]).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worker threads for animations. Default: available parallelism.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Frame scheduling for animations.
    #[arg(long, value_enum)]
    pub schedule: Option<ScheduleArg>,

    /// List the supported input formats and exit.
    #[arg(long)]
    pub formats: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// `--schedule` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScheduleArg {
    /// Fixed pool fed from a queue.
    Pool,
    /// Batches separated by a barrier.
    Batched,
}

impl From<ScheduleArg> for Schedule {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::Pool => Self::Pool,
            ScheduleArg::Batched => Self::Batched,
        }
    }
}

/// `"60,30"` → `(60, 30)`.
fn parse_pair(s: &str) -> Result<(u32, u32), String> {
    let values = parse_list(s, 2)?;
    Ok((values[0], values[1]))
}

/// `"0,255,0"` → `Rgb(0, 255, 0)`.
fn parse_rgb(s: &str) -> Result<Rgb, String> {
    let values = parse_list(s, 3)?;
    let channel = |v: u32| u8::try_from(v).map_err(|_| format!("{v} is not in 0-255"));
    Ok(Rgb(channel(values[0])?, channel(values[1])?, channel(values[2])?))
}

fn parse_list(s: &str, expected: usize) -> Result<Vec<u32>, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<u32>().map_err(|e| format!("'{v}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != expected {
        return Err(format!("expected {expected} comma-separated values, got {}", values.len()));
    }
    Ok(values)
}

impl Cli {
    /// Overlay the command-line flags on `base` (defaults or a TOML file).
    ///
    /// Flags only ever switch options on; whatever the file set stays unless
    /// a flag replaces it.
    #[must_use]
    pub fn apply(&self, mut base: RenderConfig) -> RenderConfig {
        if let Some(dims) = self.dimensions {
            base.dimensions = Some(dims);
        }
        if let Some(w) = self.width {
            base.width = Some(w);
        }
        if let Some(h) = self.height {
            base.height = Some(h);
        }

        if self.braille {
            base.glyphs = GlyphSet::Braille;
        } else if let Some(map) = &self.map {
            base.glyphs = GlyphSet::Custom(map.clone());
        } else if self.complex {
            base.glyphs = GlyphSet::Complex;
        }

        if let Some(t) = self.threshold {
            base.threshold = t;
        }
        base.dither |= self.dither;
        base.negative |= self.negative;
        base.flip_x |= self.flip_x;
        base.flip_y |= self.flip_y;

        if self.color {
            base.color_mode = ColorMode::Original;
        } else if self.grayscale {
            base.color_mode = ColorMode::Grayscale;
        }
        if self.color_bg {
            base.color_placement = ColorPlacement::Background;
        }
        if let Some(font) = self.font_color {
            base.font_color = font;
        }
        if self.ansi256 {
            base.color_level = ColorLevel::Ansi256;
        }

        if let Some(n) = self.workers {
            base.workers = Some(n);
        }
        if let Some(s) = self.schedule {
            base.schedule = s.into();
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("asciiconv").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn pair_and_rgb_parsers() {
        assert_eq!(parse_pair("60,30"), Ok((60, 30)));
        assert!(parse_pair("60").is_err());
        assert_eq!(parse_rgb("0, 255 ,9"), Ok(Rgb(0, 255, 9)));
        assert!(parse_rgb("0,256,0").is_err());
    }

    #[test]
    fn braille_beats_map_and_complex() {
        let config = parse(&["a.png", "-b", "-m", " #", "-c", "-W", "10"]).apply(RenderConfig::default());
        assert_eq!(config.glyphs, GlyphSet::Braille);
        let config = parse(&["a.png", "-m", " #", "-c"]).apply(RenderConfig::default());
        assert_eq!(config.glyphs, GlyphSet::Custom(" #".into()));
    }

    #[test]
    fn color_beats_grayscale() {
        let config = parse(&["a.png", "-C", "-g"]).apply(RenderConfig::default());
        assert_eq!(config.color_mode, ColorMode::Original);
    }

    #[test]
    fn short_flags_map_to_config() {
        let config = parse(&[
            "-", "-d", "60,30", "-n", "-x", "-y", "--256-color", "--color-bg", "--font-color", "0,0,0",
            "--schedule", "batched", "--workers", "3",
        ])
        .apply(RenderConfig::default());
        assert_eq!(config.dimensions, Some((60, 30)));
        assert!(config.negative && config.flip_x && config.flip_y);
        assert_eq!(config.color_level, ColorLevel::Ansi256);
        assert_eq!(config.color_placement, ColorPlacement::Background);
        assert_eq!(config.explicit_font_color(), Some(Rgb(0, 0, 0)));
        assert_eq!(config.schedule, Schedule::Batched);
        assert_eq!(config.workers, Some(3));
    }

    #[test]
    fn flags_override_file_values() {
        let base = RenderConfig {
            height: Some(20),
            threshold: 90,
            ..RenderConfig::default()
        };
        let config = parse(&["a.gif", "--threshold", "200"]).apply(base);
        assert_eq!(config.height, Some(20));
        assert_eq!(config.threshold, 200);
    }

    #[test]
    fn input_is_required_unless_listing_formats() {
        assert!(Cli::try_parse_from(["asciiconv"]).is_err());
        assert!(Cli::try_parse_from(["asciiconv", "--formats"]).is_ok());
    }
}
