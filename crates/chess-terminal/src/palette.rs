//! Display tokens for the colored board.
//!
//! Token names from the configuration file are resolved into [`Paint`] values
//! once, at load time. The renderer only ever sees resolved values.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The eight base terminal hues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hue {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Hue {
    pub const ALL: [Hue; 8] = [
        Hue::Black,
        Hue::Red,
        Hue::Green,
        Hue::Yellow,
        Hue::Blue,
        Hue::Magenta,
        Hue::Cyan,
        Hue::White,
    ];

    /// Offset of this hue within an SGR color block.
    pub const fn offset(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Hue::Black => "black",
            Hue::Red => "red",
            Hue::Green => "green",
            Hue::Yellow => "yellow",
            Hue::Blue => "blue",
            Hue::Magenta => "magenta",
            Hue::Cyan => "cyan",
            Hue::White => "white",
        }
    }
}

/// A single resolved display token.
///
/// `Display` writes the ANSI SGR escape sequence for the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Paint {
    /// Foreground color; `light` selects the bright variant.
    Fore { hue: Hue, light: bool },
    /// Background color; `light` selects the bright variant.
    Back { hue: Hue, light: bool },
    Bright,
    Dim,
    Reset,
}

impl Paint {
    pub const fn fore(hue: Hue) -> Self {
        Paint::Fore { hue, light: false }
    }

    pub const fn light_fore(hue: Hue) -> Self {
        Paint::Fore { hue, light: true }
    }

    pub const fn back(hue: Hue) -> Self {
        Paint::Back { hue, light: false }
    }

    pub const fn light_back(hue: Hue) -> Self {
        Paint::Back { hue, light: true }
    }

    /// The SGR parameter for this token.
    pub const fn sgr(self) -> u8 {
        match self {
            Paint::Fore { hue, light: false } => 30 + hue.offset(),
            Paint::Fore { hue, light: true } => 90 + hue.offset(),
            Paint::Back { hue, light: false } => 40 + hue.offset(),
            Paint::Back { hue, light: true } => 100 + hue.offset(),
            Paint::Bright => 1,
            Paint::Dim => 2,
            Paint::Reset => 0,
        }
    }

    /// The configuration name of this token, e.g. `back.light_magenta`.
    pub fn name(self) -> String {
        match self {
            Paint::Fore { hue, light } => format!("fore.{}{}", light_prefix(light), hue.name()),
            Paint::Back { hue, light } => format!("back.{}{}", light_prefix(light), hue.name()),
            Paint::Bright => "style.bright".to_string(),
            Paint::Dim => "style.dim".to_string(),
            Paint::Reset => "style.reset".to_string(),
        }
    }
}

fn light_prefix(light: bool) -> &'static str {
    if light {
        "light_"
    } else {
        ""
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1b[{}m", self.sgr())
    }
}

/// A token name that does not match any known [`Paint`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color token `{0}`")]
pub struct UnknownPaint(pub String);

impl FromStr for Paint {
    type Err = UnknownPaint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let unknown = || UnknownPaint(s.to_string());

        let (group, value) = lowered.split_once('.').ok_or_else(unknown)?;
        match group {
            "style" => match value {
                "bright" => Ok(Paint::Bright),
                "dim" => Ok(Paint::Dim),
                "reset" => Ok(Paint::Reset),
                _ => Err(unknown()),
            },
            "fore" | "back" => {
                let (light, hue_name) = match value.strip_prefix("light_") {
                    Some(rest) => (true, rest),
                    None => (false, value),
                };
                let hue = Hue::ALL
                    .into_iter()
                    .find(|hue| hue.name() == hue_name)
                    .ok_or_else(unknown)?;
                Ok(if group == "fore" {
                    Paint::Fore { hue, light }
                } else {
                    Paint::Back { hue, light }
                })
            }
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for Paint {
    type Error = UnknownPaint;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The full set of tokens used by the colored renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Background of the light squares (a8, c8, ...).
    pub light_square: Paint,
    /// Background of the dark squares.
    pub dark_square: Paint,
    /// Background of the file/rank label frame.
    pub border: Paint,
    /// Foreground applied to the file/rank labels.
    pub border_text: Paint,
    pub white_piece: Paint,
    pub black_piece: Paint,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            light_square: Paint::light_back(Hue::Magenta),
            dark_square: Paint::back(Hue::Yellow),
            border: Paint::light_back(Hue::Blue),
            border_text: Paint::Bright,
            white_piece: Paint::fore(Hue::White),
            black_piece: Paint::fore(Hue::Black),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_hues_both_layers() {
        for hue in Hue::ALL {
            for light in [false, true] {
                let fore = Paint::Fore { hue, light };
                let back = Paint::Back { hue, light };
                assert_eq!(fore.name().parse::<Paint>(), Ok(fore));
                assert_eq!(back.name().parse::<Paint>(), Ok(back));
            }
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Back.LIGHT_Magenta".parse::<Paint>(), Ok(Paint::light_back(Hue::Magenta)));
        assert_eq!("STYLE.bright".parse::<Paint>(), Ok(Paint::Bright));
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        for name in ["", "fore", "fore.purple", "back.light_", "style.blink", "colorama.Fore.RED"] {
            assert_eq!(
                name.parse::<Paint>(),
                Err(UnknownPaint(name.to_string())),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_sgr_codes() {
        assert_eq!(Paint::fore(Hue::Black).sgr(), 30);
        assert_eq!(Paint::light_fore(Hue::Red).sgr(), 91);
        assert_eq!(Paint::back(Hue::Yellow).sgr(), 43);
        assert_eq!(Paint::light_back(Hue::Magenta).sgr(), 105);
        assert_eq!(Paint::Bright.sgr(), 1);
        assert_eq!(Paint::Dim.sgr(), 2);
        assert_eq!(Paint::Reset.sgr(), 0);
    }

    #[test]
    fn test_display_writes_escape_sequence() {
        assert_eq!(Paint::Reset.to_string(), "\x1b[0m");
        assert_eq!(Paint::light_back(Hue::Blue).to_string(), "\x1b[104m");
    }

    #[test]
    fn test_default_palette_squares_are_distinct() {
        let palette = Palette::default();
        assert_ne!(palette.light_square, palette.dark_square);
        assert_ne!(palette.light_square, palette.border);
        assert_ne!(palette.dark_square, palette.border);
    }

    #[test]
    fn test_unknown_paint_display() {
        let err = UnknownPaint("fore.purple".to_string());
        assert_eq!(err.to_string(), "unknown color token `fore.purple`");
    }
}
