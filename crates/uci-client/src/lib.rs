//! Blocking client for UCI (Universal Chess Interface) engines.
//!
//! The client owns a single engine subprocess for its whole lifetime and talks
//! to it over stdin/stdout. Every query blocks until the engine answers.
//!
//! # Supported exchange
//!
//! - `uci` / `id name` / `id author` / `uciok` - identification
//! - `isready` / `readyok` - synchronization
//! - `position startpos|fen <fen> [moves <move>...]` - set position
//! - `go movetime <ms>` / `bestmove <move>` - timed search
//! - `quit` - shutdown

mod client;
mod message;

pub use client::{EngineId, UciClient, MAX_HANDSHAKE_LINES};
pub use message::EngineMessage;

use thiserror::Error;

/// Errors that can occur when communicating with a UCI engine.
#[derive(Error, Debug)]
pub enum UciError {
    /// The engine executable does not exist.
    #[error("Chess engine not found: {0}")]
    NotFound(String),
    /// Failed to spawn the engine process.
    #[error("Failed to spawn process: {0}")]
    SpawnError(std::io::Error),
    /// Reading from or writing to the engine failed.
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The engine closed its output stream.
    #[error("Engine closed the connection")]
    Disconnected,
    /// The engine process has exited.
    #[error("Engine not alive!")]
    NotAlive,
    /// The engine did not finish a handshake within the line budget.
    #[error("Engine did not answer `{0}`")]
    HandshakeFailed(&'static str),
    /// The engine returned an invalid or unexpected response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
