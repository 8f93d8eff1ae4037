//! Configuration file loading.
//!
//! The configuration is a TOML file read once at startup. Color token names
//! are resolved into [`Paint`](crate::palette::Paint) values while parsing, so
//! an unknown name rejects the whole file before any game starts.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::palette::Palette;

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "chess-terminal.toml";

/// Contents written to [`DEFAULT_CONFIG_PATH`] when it does not exist yet.
pub const DEFAULT_CONFIG: &str = r#"# chess-terminal configuration
#
# Color tokens: fore.<hue>, back.<hue>, style.bright, style.dim, style.reset
# where <hue> is black, red, green, yellow, blue, magenta, cyan or white,
# optionally prefixed with light_ (e.g. back.light_magenta).

[basic]
# Path to a UCI engine executable, required for -o / -oo.
engine = ""
# Single character for empty squares; blank means a space.
empty_square = ""

[colors]
light_square = "back.light_magenta"
dark_square = "back.yellow"
border = "back.light_blue"
border_text = "style.bright"
white_piece = "fore.white"
black_piece = "fore.black"
"#;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create the default configuration file.
    #[error("Failed to write default config file {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid TOML or names an unknown color token.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// An engine mode was requested but no engine path is configured.
    #[error("Need to set the path to the chess engine in {0}!")]
    MissingEnginePath(PathBuf),
    /// `empty_square` holds more than one character.
    #[error("empty_square must be a single character, got {0:?}")]
    InvalidEmptySquare(String),
}

/// Everything the renderer needs, fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Glyph printed on empty squares.
    pub empty_square: char,
    pub palette: Palette,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            empty_square: ' ',
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    basic: BasicSection,
    #[serde(default)]
    colors: Palette,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BasicSection {
    engine: String,
    empty_square: String,
}

/// Loaded application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Engine executable, if one is configured.
    pub engine: Option<PathBuf>,
    pub display: DisplayConfig,
    /// The file this configuration was read from.
    pub source: PathBuf,
}

impl Config {
    /// Parses configuration text. `source` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for invalid TOML or an unknown color
    /// token, and [`ConfigError::InvalidEmptySquare`] when `empty_square` is
    /// longer than one character.
    pub fn parse(content: &str, source: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;

        let engine = match file.basic.engine.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        let mut chars = file.basic.empty_square.chars();
        let empty_square = match (chars.next(), chars.next()) {
            (None, _) => ' ',
            (Some(c), None) => c,
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidEmptySquare(file.basic.empty_square))
            }
        };

        Ok(Self {
            engine,
            display: DisplayConfig {
                empty_square,
                palette: file.colors,
            },
            source: source.to_path_buf(),
        })
    }

    /// Loads the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Loads `path`, first writing [`DEFAULT_CONFIG`] there if the file does
    /// not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("Writing default configuration to {}", path.display());
            std::fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::WriteError {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Self::load(path)
    }

    /// The configured engine executable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnginePath`] when none is configured.
    pub fn require_engine(&self) -> Result<&Path, ConfigError> {
        self.engine
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnginePath(self.source.clone()))
    }
}
