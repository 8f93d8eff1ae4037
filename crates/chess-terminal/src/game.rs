//! Game state on top of the `shakmaty` rule engine.
//!
//! [`Game`] owns the single [`Chess`] position of a session and is the only
//! place it is mutated. It adds what a bare position does not know about:
//! the move history (SAN for display and PGN, UCI for the engine), position
//! hashes for repetition draws, and the claim-draw game-over check.

use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Board, CastlingMode, Chess, Color, EnPassantMode, Move, Position};
use std::fmt;
use thiserror::Error;

/// Errors reported by the rule engine. None of them change the position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The text is not SAN at all.
    #[error("invalid SAN: {0}")]
    InvalidSan(String),
    /// The SAN is well formed but not a legal move here.
    #[error("illegal move: {0}")]
    IllegalMove(String),
    /// The text is not a legal UCI move here.
    #[error("invalid UCI move: {0}")]
    InvalidUci(String),
    /// The FEN could not be parsed or describes an impossible position.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

/// Final or current standing of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
    /// White resigned; black wins.
    WhiteResigned,
    /// Black resigned; white wins.
    BlackResigned,
}

impl GameResult {
    /// The result of `side` resigning.
    pub const fn resignation(side: Color) -> Self {
        match side {
            Color::White => GameResult::WhiteResigned,
            Color::Black => GameResult::BlackResigned,
        }
    }

    /// PGN score string.
    pub const fn score(self) -> &'static str {
        match self {
            GameResult::Ongoing => "*",
            GameResult::WhiteWins | GameResult::BlackResigned => "1-0",
            GameResult::BlackWins | GameResult::WhiteResigned => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }

    pub const fn is_over(self) -> bool {
        !matches!(self, GameResult::Ongoing)
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.score())
    }
}

/// What to announce after a move, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Checkmate,
    Stalemate,
    Check,
    Normal,
}

impl Status {
    /// The announcement line, if any.
    pub const fn banner(self) -> Option<&'static str> {
        match self {
            Status::Checkmate => Some("CHECKMATE"),
            Status::Stalemate => Some("STALEMATE"),
            Status::Check => Some("CHECK"),
            Status::Normal => None,
        }
    }
}

/// A move that has been played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    /// SAN including check/mate suffix, e.g. `Qxf7#`.
    pub san: String,
    /// UCI notation, e.g. `h5f7`.
    pub uci: String,
}

/// `"White"` or `"Black"`.
pub const fn side_name(side: Color) -> &'static str {
    match side {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// A game in progress with its full history.
#[derive(Debug, Clone)]
pub struct Game {
    position: Chess,
    /// FEN of the starting position; `None` for the standard start.
    start_fen: Option<String>,
    /// Hash of every position reached, starting position included.
    history: Vec<Zobrist64>,
    moves: Vec<PlayedMove>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_chess(Chess::default(), None)
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|_| GameError::InvalidFen(fen.to_string()))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| GameError::InvalidFen(fen.to_string()))?;
        Ok(Self::from_chess(position, Some(fen.to_string())))
    }

    fn from_chess(position: Chess, start_fen: Option<String>) -> Self {
        let hash = hash_of(&position);
        Self {
            position,
            start_fen,
            history: vec![hash],
            moves: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn start_fen(&self) -> Option<&str> {
        self.start_fen.as_deref()
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// The current full move number, starting at 1 and incremented after
    /// black moves.
    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmoves().get()
    }

    pub fn moves(&self) -> &[PlayedMove] {
        &self.moves
    }

    /// SAN of every move played so far.
    pub fn san_moves(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.san.clone()).collect()
    }

    /// UCI of every move played so far, for `position ... moves`.
    pub fn uci_moves(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.uci.clone()).collect()
    }

    /// All legal moves in SAN.
    pub fn legal_moves_san(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|m| San::from_move(&self.position, m).to_string())
            .collect()
    }

    /// Parses `text` as SAN and plays it.
    ///
    /// A check or mate suffix is accepted but not required.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSan`] or [`GameError::IllegalMove`]; the
    /// position is unchanged in both cases.
    pub fn play_san(&mut self, text: &str) -> Result<&PlayedMove, GameError> {
        let san: SanPlus = text
            .parse()
            .map_err(|_| GameError::InvalidSan(text.to_string()))?;
        let m = san
            .san
            .to_move(&self.position)
            .map_err(|_| GameError::IllegalMove(text.to_string()))?;
        Ok(self.apply(m))
    }

    /// Plays a move given in UCI notation, as engines report it.
    pub fn play_uci(&mut self, text: &str) -> Result<&PlayedMove, GameError> {
        let uci: UciMove = text
            .parse()
            .map_err(|_| GameError::InvalidUci(text.to_string()))?;
        let m = uci
            .to_move(&self.position)
            .map_err(|_| GameError::InvalidUci(text.to_string()))?;
        Ok(self.apply(m))
    }

    /// Applies a move already validated against the current position.
    fn apply(&mut self, m: Move) -> &PlayedMove {
        let uci = m.to_uci(CastlingMode::Standard).to_string();
        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, &m).to_string();
        self.history.push(hash_of(&self.position));
        self.moves.push(PlayedMove { san, uci });
        &self.moves[self.moves.len() - 1]
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    /// How many times the current position has occurred.
    pub fn position_count(&self) -> usize {
        let current = hash_of(&self.position);
        self.history.iter().filter(|&&h| h == current).count()
    }

    /// Threefold repetition or the fifty-move rule, either already reached
    /// or reachable with one legal move of the side to move.
    pub fn can_claim_draw(&self) -> bool {
        self.can_claim_threefold() || self.can_claim_fifty_moves()
    }

    fn can_claim_threefold(&self) -> bool {
        if self.position_count() >= 3 {
            return true;
        }
        self.position.legal_moves().iter().any(|m| {
            let mut next = self.position.clone();
            next.play_unchecked(m);
            let hash = hash_of(&next);
            self.history.iter().filter(|&&h| h == hash).count() >= 2
        })
    }

    fn can_claim_fifty_moves(&self) -> bool {
        let halfmoves = self.position.halfmoves();
        halfmoves >= 100
            || (halfmoves >= 99 && self.position.legal_moves().iter().any(|m| !m.is_zeroing()))
    }

    /// Draws that end the game without a claim.
    fn is_automatic_draw(&self) -> bool {
        self.position.is_stalemate()
            || self.position.is_insufficient_material()
            || self.position.halfmoves() >= 150
            || self.position_count() >= 5
    }

    /// The announcement for the current position.
    pub fn status(&self) -> Status {
        if self.is_checkmate() {
            Status::Checkmate
        } else if self.is_stalemate() {
            Status::Stalemate
        } else if self.is_check() {
            Status::Check
        } else {
            Status::Normal
        }
    }

    /// Result of the game as it stands, treating claimable draws as claimed.
    pub fn result(&self) -> GameResult {
        if self.is_checkmate() {
            match self.turn() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }
        } else if self.is_automatic_draw() || self.can_claim_draw() {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        }
    }

    /// True once [`result`](Self::result) is no longer ongoing.
    pub fn is_over(&self) -> bool {
        self.result().is_over()
    }
}

fn hash_of(position: &Chess) -> Zobrist64 {
    position.zobrist_hash(EnPassantMode::Legal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Role, Square};

    fn play_all(game: &mut Game, moves: &[&str]) {
        for mv in moves {
            game.play_san(mv)
                .unwrap_or_else(|e| panic!("{mv} should be legal: {e}"));
        }
    }

    #[test]
    fn test_new_game_starts_at_move_one_white_to_move() {
        let game = Game::new();
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.fullmove_number(), 1);
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(game.status(), Status::Normal);
        assert_eq!(game.legal_moves_san().len(), 20);
    }

    #[test]
    fn test_play_san_moves_the_piece() {
        let mut game = Game::new();

        let played = game.play_san("e4").unwrap().clone();

        assert_eq!(played.san, "e4");
        assert_eq!(played.uci, "e2e4");
        assert_eq!(game.board().piece_at(Square::E2), None);
        assert_eq!(
            game.board().piece_at(Square::E4).map(|p| p.role),
            Some(Role::Pawn)
        );
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.fullmove_number(), 1);
    }

    #[test]
    fn test_fullmove_number_advances_after_black() {
        let mut game = Game::new();
        play_all(&mut game, &["e4", "e5"]);
        assert_eq!(game.fullmove_number(), 2);
    }

    #[test]
    fn test_invalid_and_illegal_san_leave_position_unchanged() {
        let mut game = Game::new();
        let before = game.board().clone();

        assert_eq!(
            game.play_san("hello").unwrap_err(),
            GameError::InvalidSan("hello".to_string())
        );
        assert_eq!(
            game.play_san("e5").unwrap_err(),
            GameError::IllegalMove("e5".to_string())
        );

        assert_eq!(game.board(), &before);
        assert_eq!(game.turn(), Color::White);
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_play_uci_records_san() {
        let mut game = Game::new();
        let played = game.play_uci("g1f3").unwrap().clone();
        assert_eq!(played.san, "Nf3");
        assert_eq!(game.uci_moves(), vec!["g1f3".to_string()]);
    }

    #[test]
    fn test_play_uci_rejects_illegal_move() {
        let mut game = Game::new();
        assert!(matches!(game.play_uci("e2e5"), Err(GameError::InvalidUci(_))));
        assert!(matches!(game.play_uci("zz"), Err(GameError::InvalidUci(_))));
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_castling_is_reported_in_standard_uci() {
        let mut game = Game::new();
        play_all(&mut game, &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"]);
        let castle = game.play_san("O-O").unwrap().clone();
        assert_eq!(castle.uci, "e1g1");
        assert_eq!(castle.san, "O-O");
    }

    #[test]
    fn test_checkmate_result_and_status() {
        let mut game = Game::new();
        play_all(&mut game, &["f3", "e5", "g4", "Qh4#"]);

        assert_eq!(game.status(), Status::Checkmate);
        assert_eq!(game.result(), GameResult::BlackWins);
        assert_eq!(game.moves().last().unwrap().san, "Qh4#");
        assert!(game.is_over());
    }

    #[test]
    fn test_check_is_informational() {
        let mut game = Game::new();
        play_all(&mut game, &["e4", "f5", "Qh5+"]);

        assert_eq!(game.status(), Status::Check);
        assert!(!game.is_over());
    }

    #[test]
    fn test_stalemate_is_a_draw() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();

        assert_eq!(game.status(), Status::Stalemate);
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_threefold_repetition_ends_the_game() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        play_all(&mut game, &["Ra2", "Kd8", "Ra1", "Ke8"]);
        assert!(!game.is_over());
        assert_eq!(game.position_count(), 2);

        play_all(&mut game, &["Ra2", "Kd8", "Ra1", "Ke8"]);

        assert_eq!(game.position_count(), 3);
        assert!(game.can_claim_draw());
        assert_eq!(game.result(), GameResult::Draw);
        assert_eq!(game.status(), Status::Normal);
    }

    #[test]
    fn test_threefold_claim_by_next_move() {
        let mut game = Game::new();
        play_all(&mut game, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6"]);
        assert!(!game.can_claim_draw());

        // Ng8 would reach the starting position for the third time.
        play_all(&mut game, &["Ng1"]);

        assert_eq!(game.position_count(), 2);
        assert!(game.can_claim_draw());
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_fifty_move_claim_by_next_move() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        assert!(game.can_claim_draw());

        let game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 98 80").unwrap();
        assert!(!game.can_claim_draw());
    }

    #[test]
    fn test_fifty_move_rule_is_claimable() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        assert!(game.can_claim_draw());
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_insufficient_material_is_a_draw() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.result(), GameResult::Draw);
    }

    #[test]
    fn test_from_fen_rejects_garbage() {
        assert!(matches!(
            Game::from_fen("not a fen"),
            Err(GameError::InvalidFen(_))
        ));
    }

    #[test]
    fn test_result_scores() {
        assert_eq!(GameResult::WhiteWins.score(), "1-0");
        assert_eq!(GameResult::BlackResigned.score(), "1-0");
        assert_eq!(GameResult::BlackWins.score(), "0-1");
        assert_eq!(GameResult::WhiteResigned.score(), "0-1");
        assert_eq!(GameResult::Draw.score(), "1/2-1/2");
        assert_eq!(GameResult::Ongoing.score(), "*");
    }

    #[test]
    fn test_resignation_loser_is_the_resigning_side() {
        assert_eq!(GameResult::resignation(Color::Black).score(), "1-0");
        assert_eq!(GameResult::resignation(Color::White).score(), "0-1");
        assert!(GameResult::resignation(Color::White).is_over());
    }

    #[test]
    fn test_side_name() {
        assert_eq!(side_name(Color::White), "White");
        assert_eq!(side_name(Color::Black), "Black");
    }
}
