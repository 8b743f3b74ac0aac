//! Error types for the engine's text boundaries.
//!
//! Everything inside the engine speaks `Color` and bitboards; the only
//! recoverable failures are parsing ones, raised here and never committed as
//! partial state.

use thiserror::Error;

/// A color argument that is not white or black in any accepted spelling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid colour `{0}`, expected white or black")]
pub struct InvalidColorError(pub String);

/// A FEN string that cannot be turned into a board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFenError {
    #[error("FEN must have 6 space-delimited fields, got {0}")]
    WrongFieldCount(usize),
    #[error("piece placement must describe 8 ranks, got {0}")]
    WrongRankCount(usize),
    #[error("unrecognized piece letter `{0}` in piece placement")]
    UnknownPiece(char),
    #[error("rank `{0}` does not describe exactly 8 squares")]
    BadRankWidth(String),
    #[error(transparent)]
    InvalidColor(#[from] InvalidColorError),
    #[error("unrecognized castling letter `{0}`")]
    BadCastlingFlag(char),
    #[error("`{0}` is not a square in algebraic notation")]
    BadSquare(String),
    #[error("`{0}` is not a valid move counter")]
    BadCounter(String),
}
