//! PGN (Portable Game Notation) export of a finished session.
//!
//! One file per session, written under [`PGN_DIR`] with a random UUID as the
//! file name so sessions never overwrite each other.

use chrono::Local;
use shakmaty::Color;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::game::{Game, GameResult};
use crate::session::OpponentMode;

/// Directory the PGN files are written to.
pub const PGN_DIR: &str = "pgns";

/// Movetext lines are wrapped before this many columns.
const LINE_WIDTH: usize = 80;

/// Everything that goes into one PGN file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Date in PGN format, `YYYY.MM.DD`.
    pub date: String,
    pub white: String,
    pub black: String,
    pub result: GameResult,
    /// FEN of the starting position; `None` for the standard start.
    pub start_fen: Option<String>,
    /// Ply index of the first move, 0 being white's first move.
    pub start_ply: u32,
    /// Moves in SAN.
    pub moves: Vec<String>,
}

impl GameRecord {
    /// Builds the record of `game`, dated today.
    ///
    /// `result` is the session's result, which differs from the position's
    /// own result after a resignation.
    pub fn new(game: &Game, mode: OpponentMode, result: GameResult) -> Self {
        let moves = game.san_moves();
        let current_ply =
            (game.fullmove_number() - 1) * 2 + u32::from(game.turn() == Color::Black);
        Self {
            date: Local::now().format("%Y.%m.%d").to_string(),
            white: mode.player_label(Color::White).to_string(),
            black: mode.player_label(Color::Black).to_string(),
            result,
            start_fen: game.start_fen().map(str::to_string),
            start_ply: current_ply.saturating_sub(moves.len() as u32),
            moves,
        }
    }
}

/// Writes `record` as PGN: the seven tag roster (plus `SetUp` and `FEN` for a
/// game not started from the initial position), a blank line, then the
/// numbered movetext ending in the result.
pub fn write_pgn<W: Write>(mut writer: W, record: &GameRecord) -> std::io::Result<()> {
    let score = record.result.score();

    writeln!(writer, "[Event \"chess-terminal\"]")?;
    writeln!(writer, "[Site \"local\"]")?;
    writeln!(writer, "[Date \"{}\"]", record.date)?;
    writeln!(writer, "[Round \"-\"]")?;
    writeln!(writer, "[White \"{}\"]", record.white)?;
    writeln!(writer, "[Black \"{}\"]", record.black)?;
    writeln!(writer, "[Result \"{}\"]", score)?;
    if let Some(fen) = &record.start_fen {
        writeln!(writer, "[SetUp \"1\"]")?;
        writeln!(writer, "[FEN \"{}\"]", fen)?;
    }
    writeln!(writer)?;

    for line in movetext_lines(&record.moves, record.start_ply, score) {
        writeln!(writer, "{}", line)?;
    }
    writeln!(writer)?;

    Ok(())
}

/// Numbered movetext split into lines of at most [`LINE_WIDTH`] columns,
/// breaking only between tokens. A game that starts with black to move opens
/// with `N...`.
fn movetext_lines(moves: &[String], start_ply: u32, score: &str) -> Vec<String> {
    let mut tokens = Vec::with_capacity(moves.len() * 3 / 2 + 2);
    for (ply, san) in (start_ply..).zip(moves) {
        let number = ply / 2 + 1;
        if ply % 2 == 0 {
            tokens.push(format!("{}.", number));
        } else if ply == start_ply {
            tokens.push(format!("{}...", number));
        }
        tokens.push(san.clone());
    }
    tokens.push(score.to_string());

    let mut lines = Vec::new();
    let mut current = String::new();
    for token in tokens {
        if !current.is_empty() && current.len() + 1 + token.len() > LINE_WIDTH {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&token);
    }
    lines.push(current);
    lines
}

/// Writes `record` to a new `<uuid>.pgn` file in `dir`, creating `dir` if
/// needed, and returns the path.
pub fn save_to_dir(dir: &Path, record: &GameRecord) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.pgn", uuid::Uuid::new_v4()));
    let file = std::fs::File::create(&path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_pgn(&mut writer, record)?;
    writer.flush()?;
    Ok(path)
}
