use std::fmt::Write as _;

use ac_ascii::mapper::RenderedGlyph;
use ac_core::color::{Rgb, rgb_to_ansi256};
use ac_core::config::{ColorLevel, ColorPlacement};
use ac_core::frame::Grid;
use serde::Serialize;

/// Reset SGR appended after every colored glyph.
pub const RESET: &str = "\x1b[0m";

/// SGR prefix selecting `color` for the glyph or its cell.
///
/// # Example
/// ```
/// use ac_core::color::Rgb;
/// use ac_core::config::{ColorLevel, ColorPlacement};
/// use ac_render::flatten::escape;
/// assert_eq!(escape(Rgb(1, 2, 3), ColorPlacement::Foreground, ColorLevel::TrueColor), "\x1b[38;2;1;2;3m");
/// assert_eq!(escape(Rgb(255, 135, 0), ColorPlacement::Background, ColorLevel::Ansi256), "\x1b[48;5;208m");
/// ```
#[must_use]
pub fn escape(color: Rgb, placement: ColorPlacement, level: ColorLevel) -> String {
    let layer = match placement {
        ColorPlacement::Foreground => 38,
        ColorPlacement::Background => 48,
    };
    match level {
        ColorLevel::TrueColor => format!("\x1b[{layer};2;{};{};{}m", color.0, color.1, color.2),
        ColorLevel::Ansi256 => format!("\x1b[{layer};5;{}m", rgb_to_ansi256(color)),
    }
}

/// Flatten a glyph grid into newline-joined terminal text.
///
/// Plain glyphs are written as-is; colored ones are wrapped in their escape
/// and followed by a reset. No trailing newline.
///
/// # Example
/// ```
/// use ac_ascii::mapper::RenderedGlyph;
/// use ac_core::config::{ColorLevel, ColorPlacement};
/// use ac_core::frame::Grid;
/// use ac_render::flatten::to_text;
/// let grid = Grid::new(2, 2, RenderedGlyph { ch: '#', color: None });
/// assert_eq!(to_text(&grid, ColorPlacement::Foreground, ColorLevel::TrueColor), "##\n##");
/// ```
#[must_use]
pub fn to_text(grid: &Grid<RenderedGlyph>, placement: ColorPlacement, level: ColorLevel) -> String {
    let mut out = String::with_capacity(grid.cells.len() + grid.height);
    for (y, row) in grid.rows().enumerate() {
        if y > 0 {
            out.push('\n');
        }
        for glyph in row {
            match glyph.color {
                Some(color) => {
                    let _ = write!(out, "{}{}{RESET}", escape(color, placement, level), glyph.ch);
                }
                None => out.push(glyph.ch),
            }
        }
    }
    out
}

/// Cellule JSON : `{"char": "x", "rgb": [r, g, b] | null}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColoredChar {
    /// The glyph as a one-character string.
    #[serde(rename = "char")]
    pub ch: String,
    /// Resolved color, `null` for plain glyphs.
    pub rgb: Option<Rgb>,
}

/// Row-major structured form of a glyph grid.
#[must_use]
pub fn to_rows(grid: &Grid<RenderedGlyph>) -> Vec<Vec<ColoredChar>> {
    grid.rows()
        .map(|row| {
            row.iter()
                .map(|g| ColoredChar {
                    ch: g.ch.to_string(),
                    rgb: g.color,
                })
                .collect()
        })
        .collect()
}

/// Pretty-printed JSON of [`to_rows`].
///
/// # Errors
/// Propagates `serde_json` failures.
///
/// # Example
/// ```
/// use ac_ascii::mapper::RenderedGlyph;
/// use ac_core::color::Rgb;
/// use ac_core::frame::Grid;
/// use ac_render::flatten::to_json;
/// let grid = Grid::new(1, 1, RenderedGlyph { ch: '@', color: Some(Rgb(1, 2, 3)) });
/// let json: serde_json::Value = serde_json::from_str(&to_json(&grid).unwrap()).unwrap();
/// assert_eq!(json[0][0]["char"], "@");
/// assert_eq!(json[0][0]["rgb"], serde_json::json!([1, 2, 3]));
/// ```
pub fn to_json(grid: &Grid<RenderedGlyph>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_rows(grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char, color: Option<Rgb>) -> RenderedGlyph {
        RenderedGlyph { ch, color }
    }

    #[test]
    fn every_colored_glyph_is_reset() {
        let grid = Grid::from_cells(2, 1, vec![glyph('a', Some(Rgb(9, 8, 7))), glyph('b', None)]).unwrap();
        let text = to_text(&grid, ColorPlacement::Foreground, ColorLevel::TrueColor);
        assert_eq!(text, "\x1b[38;2;9;8;7ma\x1b[0mb");
    }

    #[test]
    fn background_placement_changes_only_the_layer() {
        let grid = Grid::new(1, 1, glyph('x', Some(Rgb(0, 0, 0))));
        let fg = to_text(&grid, ColorPlacement::Foreground, ColorLevel::Ansi256);
        let bg = to_text(&grid, ColorPlacement::Background, ColorLevel::Ansi256);
        assert_eq!(fg, "\x1b[38;5;16mx\x1b[0m");
        assert_eq!(bg, "\x1b[48;5;16mx\x1b[0m");
    }

    #[test]
    fn plain_json_has_null_colors() {
        let grid = Grid::new(2, 1, glyph('.', None));
        let json: serde_json::Value = serde_json::from_str(&to_json(&grid).unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(1));
        assert!(json[0][1]["rgb"].is_null());
    }

    #[test]
    fn multibyte_glyphs_survive() {
        let grid = Grid::new(1, 1, glyph('\u{28FF}', None));
        assert_eq!(to_text(&grid, ColorPlacement::Foreground, ColorLevel::TrueColor), "\u{28FF}");
        assert_eq!(to_rows(&grid)[0][0].ch, "\u{28FF}");
    }
}
