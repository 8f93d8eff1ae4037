//! The turn sequencer.
//!
//! Each turn asks exactly one move source for a move: the human prompt or the
//! engine. A move reaches the position only after the rule engine accepts it,
//! then the board is redrawn and the new position is checked for the end of
//! the game. Everything blocks; there is never more than one move pending.

use shakmaty::Color;
use std::io::{BufRead, Write};
use std::time::Duration;
use thiserror::Error;
use uci_client::{UciClient, UciError};

use crate::config::DisplayConfig;
use crate::game::{side_name, Game, GameError, GameResult};
use crate::render::{render, RenderMode};

/// Who plays which side, fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentMode {
    HumanVsHuman,
    /// The human plays the given side; the engine plays the other.
    HumanVsEngine(Color),
    EngineVsEngine,
}

impl OpponentMode {
    /// Converts the `-o` flag count: absent, once or twice.
    ///
    /// Returns `None` for any higher count.
    pub const fn from_count(count: u8, human_side: Color) -> Option<Self> {
        match count {
            0 => Some(OpponentMode::HumanVsHuman),
            1 => Some(OpponentMode::HumanVsEngine(human_side)),
            2 => Some(OpponentMode::EngineVsEngine),
            _ => None,
        }
    }

    /// Where the move for `side` comes from.
    pub fn source_for(self, side: Color) -> MoveSource {
        match self {
            OpponentMode::HumanVsHuman => MoveSource::Human,
            OpponentMode::HumanVsEngine(human) if human == side => MoveSource::Human,
            OpponentMode::HumanVsEngine(_) => MoveSource::Engine,
            OpponentMode::EngineVsEngine => MoveSource::Engine,
        }
    }

    /// True if any side is played by the engine.
    pub const fn needs_engine(self) -> bool {
        !matches!(self, OpponentMode::HumanVsHuman)
    }

    /// PGN player label for `side`.
    pub fn player_label(self, side: Color) -> &'static str {
        match self.source_for(side) {
            MoveSource::Human => "Player",
            MoveSource::Engine => "Engine",
        }
    }
}

/// Supplier of one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Human,
    Engine,
}

/// A synchronous engine that answers one best-move query at a time.
pub trait EngineHandle {
    /// Best move in UCI notation for the position reached by playing `moves`
    /// from `start_fen` (or the standard start), searching for `think_time`.
    fn best_move(
        &mut self,
        start_fen: Option<&str>,
        moves: &[String],
        think_time: Duration,
    ) -> Result<String, UciError>;
}

impl EngineHandle for UciClient {
    fn best_move(
        &mut self,
        start_fen: Option<&str>,
        moves: &[String],
        think_time: Duration,
    ) -> Result<String, UciError> {
        UciClient::best_move(self, start_fen, moves, think_time)
    }
}

/// Errors that end a session early. None of them are retried.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The engine could not be reached or answered nonsense.
    #[error("Engine error: {0}")]
    Engine(#[from] UciError),
    /// The engine's best move was rejected by the rule engine.
    #[error("Engine played an illegal move: {0}")]
    IllegalEngineMove(#[source] GameError),
    /// An engine turn came up but the session has no engine.
    #[error("No engine attached for {0} to move")]
    NoEngine(&'static str),
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The user closed the input while being prompted.
    #[error("Exited")]
    Cancelled,
}

/// Fixed settings of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub mode: OpponentMode,
    /// Engine search time per move.
    pub think_time: Duration,
    pub render_mode: RenderMode,
}

/// What the human typed at the prompt, once it is something actionable.
enum HumanTurn {
    Moved(String),
    Resign,
}

/// A single game from the first prompt to the result line.
///
/// `R` is the line-oriented human input, `W` receives everything printed,
/// and `E` is the engine used for engine turns.
pub struct Session<'a, R: BufRead, W: Write, E: EngineHandle> {
    game: Game,
    options: SessionOptions,
    display: &'a DisplayConfig,
    input: R,
    output: W,
    engine: Option<E>,
}

impl<'a, R: BufRead, W: Write, E: EngineHandle> Session<'a, R, W, E> {
    pub fn new(
        options: SessionOptions,
        display: &'a DisplayConfig,
        input: R,
        output: W,
        engine: Option<E>,
    ) -> Self {
        Self::with_game(Game::new(), options, display, input, output, engine)
    }

    /// Starts the session from an existing game instead of the initial
    /// position.
    pub fn with_game(
        game: Game,
        options: SessionOptions,
        display: &'a DisplayConfig,
        input: R,
        output: W,
        engine: Option<E>,
    ) -> Self {
        Self {
            game,
            options,
            display,
            input,
            output,
            engine,
        }
    }

    /// Hands back the output sink, the game and the engine.
    pub fn into_parts(self) -> (Game, W, Option<E>) {
        (self.game, self.output, self.engine)
    }

    /// Plays until the game ends or a side resigns, and prints the result.
    ///
    /// # Errors
    ///
    /// [`SessionError::Cancelled`] when input ends at a prompt; engine and
    /// I/O failures abort the session as they happen.
    pub fn run(&mut self) -> Result<GameResult, SessionError> {
        writeln!(
            self.output,
            "\nType(?) to show valid moves and (resign), to resign.\n"
        )?;
        writeln!(self.output, "Board")?;
        self.render()?;

        let result = loop {
            let result = self.game.result();
            if result.is_over() {
                break result;
            }

            let side = self.game.turn();
            let number = self.game.fullmove_number();

            let san = match self.options.mode.source_for(side) {
                MoveSource::Human => match self.human_turn(side)? {
                    HumanTurn::Moved(san) => san,
                    HumanTurn::Resign => {
                        writeln!(self.output, "{} resigned.", side_name(side))?;
                        break GameResult::resignation(side);
                    }
                },
                MoveSource::Engine => self.engine_turn(side)?,
            };

            writeln!(self.output, "{} ({}): {}", side_name(side), number, san)?;
            self.render()?;
            if let Some(banner) = self.game.status().banner() {
                writeln!(self.output, "{}", banner)?;
            }
        };

        tracing::info!(result = %result, plies = self.game.moves().len(), "game finished");
        writeln!(self.output, "Result: {}", result)?;
        self.output.flush()?;
        Ok(result)
    }

    fn render(&mut self) -> Result<(), SessionError> {
        let board = render(self.game.board(), self.display, self.options.render_mode);
        writeln!(self.output, "{}\n", board)?;
        Ok(())
    }

    /// Prompts until the human enters a legal move or resigns.
    fn human_turn(&mut self, side: Color) -> Result<HumanTurn, SessionError> {
        loop {
            write!(
                self.output,
                "{} ({}): ",
                side_name(side),
                self.game.fullmove_number()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(SessionError::Cancelled);
            }

            match line.trim() {
                "resign" => return Ok(HumanTurn::Resign),
                "?" => {
                    let legal = self.game.legal_moves_san().join(", ");
                    writeln!(self.output, "\nLegal moves: {}\n", legal)?;
                }
                text => match self.game.play_san(text) {
                    Ok(played) => return Ok(HumanTurn::Moved(played.san.clone())),
                    Err(e) => {
                        tracing::debug!("rejected input: {}", e);
                        writeln!(self.output, "Invalid move!")?;
                    }
                },
            }
        }
    }

    /// Asks the engine for a move and plays it.
    fn engine_turn(&mut self, side: Color) -> Result<String, SessionError> {
        writeln!(
            self.output,
            "{} ({}): thinking...",
            side_name(side),
            self.game.fullmove_number()
        )?;
        self.output.flush()?;

        let engine = self
            .engine
            .as_mut()
            .ok_or(SessionError::NoEngine(side_name(side)))?;
        let best = engine.best_move(
            self.game.start_fen(),
            &self.game.uci_moves(),
            self.options.think_time,
        )?;
        tracing::info!(side = side_name(side), bestmove = %best, "engine moved");

        let played = self
            .game
            .play_uci(&best)
            .map_err(SessionError::IllegalEngineMove)?;
        Ok(played.san.clone())
    }
}
