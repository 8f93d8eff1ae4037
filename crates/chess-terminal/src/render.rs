//! Text rendering of the board.
//!
//! Both modes draw rank 8 at the top and file a on the left, framed by file
//! labels above and below and rank numbers on both sides. There is no
//! flipped view.
//!
//! ```text
//!     a b c d e f g h
//!
//!  8  r n b q k b n r  8
//!  ...
//!  1  R N B Q K B N R  1
//!
//!     a b c d e f g h
//! ```

use shakmaty::{Board, Color, File, Piece, Rank, Square};

use crate::config::DisplayConfig;
use crate::palette::Paint;

/// How to draw the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Plain text, pieces in FEN letters.
    Plain,
    /// ANSI colors. With `compact`, black pieces keep their lowercase
    /// letter; otherwise every piece is uppercase and only the color tells
    /// the sides apart.
    Colored { compact: bool },
}

/// Checkerboard shade of a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

/// Shade of the square at `row` (0 = rank 8) and `col` (0 = file a).
///
/// a8 is light, and every step along a rank or file flips the shade.
pub const fn shade_at(row: usize, col: usize) -> Shade {
    if (row + col) % 2 == 0 {
        Shade::Light
    } else {
        Shade::Dark
    }
}

/// Renders `board` in the given mode.
pub fn render(board: &Board, display: &DisplayConfig, mode: RenderMode) -> String {
    match mode {
        RenderMode::Plain => render_plain(board, display),
        RenderMode::Colored { compact } => render_colored(board, display, compact),
    }
}

/// Ranks top to bottom, paired with their row index.
fn rows() -> impl Iterator<Item = (usize, Rank)> {
    Rank::ALL.into_iter().rev().enumerate()
}

fn square(file: File, rank: Rank) -> Square {
    Square::from_coords(file, rank)
}

/// Renders the board as plain text.
///
/// Label rows and rank rows are padded to the same width.
pub fn render_plain(board: &Board, display: &DisplayConfig) -> String {
    let labels = plain_file_labels();
    let mut out = String::new();

    out.push_str(&labels);
    out.push_str("\n\n");

    for (row, rank) in rows() {
        let number = rank.char();
        out.push(' ');
        out.push(number);
        out.push(' ');
        for file in File::ALL {
            out.push(' ');
            out.push(match board.piece_at(square(file, rank)) {
                Some(piece) => piece.char(),
                None => display.empty_square,
            });
        }
        out.push_str("  ");
        out.push(number);
        out.push(' ');
        if row < 7 {
            out.push('\n');
        }
    }

    out.push_str("\n\n");
    out.push_str(&labels);
    out
}

fn plain_file_labels() -> String {
    let mut labels = String::from("   ");
    for file in File::ALL {
        labels.push(' ');
        labels.push(file.char());
    }
    labels.push_str("    ");
    labels
}

/// Renders the board with ANSI colors.
///
/// Every colored run is closed with a reset before the next one starts, so
/// square backgrounds never bleed into the frame.
pub fn render_colored(board: &Board, display: &DisplayConfig, compact: bool) -> String {
    let palette = &display.palette;
    let labels = colored_file_labels(display);
    let mut out = String::new();

    out.push_str(&labels);
    out.push('\n');

    for (row, rank) in rows() {
        push_rank_label(&mut out, display, rank);

        for (col, file) in File::ALL.into_iter().enumerate() {
            let background = match shade_at(row, col) {
                Shade::Light => palette.light_square,
                Shade::Dark => palette.dark_square,
            };

            let glyph = match board.piece_at(square(file, rank)) {
                Some(piece) => format!(
                    "{}{}",
                    piece_paint(display, piece),
                    colored_glyph(piece, compact)
                ),
                None => display.empty_square.to_string(),
            };
            out.push_str(&format!(
                "{bg} {glyph}{reset}{bg} {reset}",
                bg = background,
                reset = Paint::Reset,
            ));
        }

        push_rank_label(&mut out, display, rank);
        if row < 7 {
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&labels);
    out
}

fn piece_paint(display: &DisplayConfig, piece: Piece) -> Paint {
    match piece.color {
        Color::White => display.palette.white_piece,
        Color::Black => display.palette.black_piece,
    }
}

fn colored_glyph(piece: Piece, compact: bool) -> char {
    if compact {
        piece.char()
    } else {
        piece.char().to_ascii_uppercase()
    }
}

/// ` 8 ` on the border background.
fn push_rank_label(out: &mut String, display: &DisplayConfig, rank: Rank) {
    let palette = &display.palette;
    out.push_str(&format!(
        "{border} {text}{number}{reset}{border} {reset}",
        border = palette.border,
        text = palette.border_text,
        number = rank.char(),
        reset = Paint::Reset,
    ));
}

/// The file label row, padded to the width of a rank row.
fn colored_file_labels(display: &DisplayConfig) -> String {
    let palette = &display.palette;
    let cells: Vec<String> = File::ALL
        .into_iter()
        .map(|file| {
            format!(
                "{}{}{}{}",
                palette.border_text,
                file.char(),
                Paint::Reset,
                palette.border
            )
        })
        .collect();

    format!(
        "{border}    {cells}    {reset}",
        border = palette.border,
        cells = cells.join("  "),
        reset = Paint::Reset,
    )
}
