//! chess-terminal - play chess in the terminal against a person or a UCI engine.
//!
//! The rules themselves come from `shakmaty` and the engine is driven through
//! the `uci-client` crate. This crate draws the board, reads moves and runs
//! the turns.
//!
//! # Modules
//!
//! - [`palette`] - display tokens and the color palette
//! - [`config`] - TOML configuration loading
//! - [`render`] - plain and ANSI-colored board rendering
//! - [`game`] - game state, history and end-of-game detection
//! - [`session`] - the turn sequencer
//! - [`pgn`] - PGN export

pub mod config;
pub mod game;
pub mod palette;
pub mod pgn;
pub mod render;
pub mod session;

pub use config::{Config, ConfigError, DisplayConfig};
pub use game::{Game, GameError, GameResult, Status};
pub use palette::{Paint, Palette};
pub use render::{render, RenderMode};
pub use session::{EngineHandle, OpponentMode, Session, SessionError, SessionOptions};
