//! Crate-wide error types for the parsing surfaces.
//!
//! Board mutation preconditions (applying a move for the wrong color,
//! undoing with an empty history) are programming errors and assert
//! instead of returning these.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A FEN string that could not be understood, with a reason.
    InvalidFen(String),
    /// A coordinate like `e9` or `i4`.
    InvalidSquare(String),
    /// A long-algebraic (UCI) move string that does not describe a
    /// playable move on the current board.
    InvalidUciMove(String),
    /// A SAN token that matched no legal move, or more than one.
    InvalidSan(String),
    /// A PGN stream error with its position.
    InvalidPgn {
        line: usize,
        col: usize,
        message: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidFen(msg) => write!(f, "invalid FEN: {msg}"),
            ParseError::InvalidSquare(s) => write!(f, "invalid square: {s}"),
            ParseError::InvalidUciMove(s) => write!(f, "invalid UCI move: {s}"),
            ParseError::InvalidSan(s) => write!(f, "invalid SAN move: {s}"),
            ParseError::InvalidPgn { line, col, message } => {
                write!(f, "PGN parse error at {line}:{col}: {message}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
