//! Board state: per-color per-piece-type bitboards, castling rights and the
//! en-passant target, plus FEN import/export.
//!
//! The board is the only mutable game state in the engine. It is mutated
//! exclusively through the move handler and copied wholesale for undo
//! snapshots, so it stays small and `Copy`.

use itertools::Itertools;

use crate::bitboard::{bb_to_sq, sq_to_bb, square_index, square_name, Bitboard, RANK_2, RANK_7};
use crate::errors::ParseFenError;
use crate::types::{CastleSide, Color, PieceType};

pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling availability per color and side. Play only ever clears these;
/// they are set again only when a board is rebuilt from FEN.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn none() -> Self {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn all() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn get(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside,
            (Color::White, CastleSide::Queenside) => self.white_queenside,
            (Color::Black, CastleSide::Kingside) => self.black_kingside,
            (Color::Black, CastleSide::Queenside) => self.black_queenside,
        }
    }

    pub fn clear(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside = false,
            (Color::White, CastleSide::Queenside) => self.white_queenside = false,
            (Color::Black, CastleSide::Kingside) => self.black_kingside = false,
            (Color::Black, CastleSide::Queenside) => self.black_queenside = false,
        }
    }

    pub fn clear_both(&mut self, color: Color) {
        self.clear(color, CastleSide::Kingside);
        self.clear(color, CastleSide::Queenside);
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Board {
    /// Indexed as `pieces[color][piece type]`.
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub castling: CastlingRights,
    /// At most one bit set: the square a double pawn push just skipped.
    /// Valid only for the immediately following move.
    pub en_passant: Bitboard,
    /// Accepted and emitted by FEN but not consulted by the engine.
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Board {
    pub fn empty() -> Board {
        Board {
            pieces: [[0; 6]; 2],
            castling: CastlingRights::none(),
            en_passant: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard initial position.
    pub fn new_game() -> Board {
        let mut board = Board::empty();
        let w = Color::White.index();
        let b = Color::Black.index();
        board.pieces[w][PieceType::Pawn.index()] = RANK_2;
        board.pieces[w][PieceType::Knight.index()] = 0x42;
        board.pieces[w][PieceType::Bishop.index()] = 0x24;
        board.pieces[w][PieceType::Rook.index()] = 0x81;
        board.pieces[w][PieceType::Queen.index()] = 0x08;
        board.pieces[w][PieceType::King.index()] = 0x10;
        board.pieces[b][PieceType::Pawn.index()] = RANK_7;
        board.pieces[b][PieceType::Knight.index()] = 0x42 << 56;
        board.pieces[b][PieceType::Bishop.index()] = 0x24 << 56;
        board.pieces[b][PieceType::Rook.index()] = 0x81 << 56;
        board.pieces[b][PieceType::Queen.index()] = 0x08 << 56;
        board.pieces[b][PieceType::King.index()] = 0x10 << 56;
        board.castling = CastlingRights::all();
        board
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, piece: PieceType) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub fn set_piece(&mut self, square: Bitboard, piece: PieceType, color: Color) {
        self.pieces[color.index()][piece.index()] |= square;
    }

    #[inline]
    pub fn clear_piece(&mut self, square: Bitboard, piece: PieceType, color: Color) {
        self.pieces[color.index()][piece.index()] &= !square;
    }

    /// Which of `color`'s piece types occupies `square`, if any. Scans the
    /// color's six bitboards; absence is a legitimate outcome, not an error.
    pub fn piece_at(&self, square: Bitboard, color: Color) -> Option<PieceType> {
        PieceType::ALL
            .into_iter()
            .find(|piece| self.pieces_of(color, *piece) & square != 0)
    }

    /// Remove whatever piece of `color` occupies `square`, reporting which
    /// piece type was cleared. `None` means the square held nothing of that
    /// color (e.g. a non-capturing move probing its target).
    pub fn remove_piece_at(&mut self, square: Bitboard, color: Color) -> Option<PieceType> {
        let piece = self.piece_at(square, color)?;
        self.clear_piece(square, piece, color);
        Some(piece)
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.pieces[color.index()]
            .iter()
            .fold(0, |acc, bb| acc | bb)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied_by(Color::White) | self.occupied_by(Color::Black)
    }

    /// Single-bit mask of `color`'s king.
    #[inline]
    pub fn king(&self, color: Color) -> Bitboard {
        self.pieces_of(color, PieceType::King)
    }

    pub fn piece_and_color_at(&self, square: Bitboard) -> Option<(PieceType, Color)> {
        if let Some(piece) = self.piece_at(square, Color::White) {
            return Some((piece, Color::White));
        }
        self.piece_at(square, Color::Black)
            .map(|piece| (piece, Color::Black))
    }

    /// Build a board from a FEN string, also returning the side to move.
    /// Nothing is committed on failure.
    pub fn from_fen(fen: &str) -> Result<(Board, Color), ParseFenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(ParseFenError::WrongFieldCount(parts.len()));
        }

        let rows: Vec<&str> = parts[0].split('/').collect();
        if rows.len() != 8 {
            return Err(ParseFenError::WrongRankCount(rows.len()));
        }

        let mut board = Board::empty();
        for (row_index, row) in rows.iter().enumerate() {
            let rank = 7 - row_index as u8; // FEN lists rank 8 first
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as u8;
                } else {
                    let piece =
                        PieceType::from_fen_char(c).ok_or(ParseFenError::UnknownPiece(c))?;
                    let color = if c.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file > 7 {
                        return Err(ParseFenError::BadRankWidth(row.to_string()));
                    }
                    board.set_piece(sq_to_bb(rank * 8 + file), piece, color);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(ParseFenError::BadRankWidth(row.to_string()));
            }
        }

        if parts[1].len() != 1 {
            return Err(ParseFenError::InvalidColor(
                crate::errors::InvalidColorError(parts[1].to_string()),
            ));
        }
        let active = Color::from_fen_char(parts[1].chars().next().unwrap())?;

        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => board.castling.white_kingside = true,
                    'Q' => board.castling.white_queenside = true,
                    'k' => board.castling.black_kingside = true,
                    'q' => board.castling.black_queenside = true,
                    other => return Err(ParseFenError::BadCastlingFlag(other)),
                }
            }
        }

        if parts[3] != "-" {
            let sq = square_index(parts[3])
                .ok_or_else(|| ParseFenError::BadSquare(parts[3].to_string()))?;
            board.en_passant = sq_to_bb(sq);
        }

        board.halfmove_clock = parts[4]
            .parse()
            .map_err(|_| ParseFenError::BadCounter(parts[4].to_string()))?;
        board.fullmove_number = parts[5]
            .parse()
            .map_err(|_| ParseFenError::BadCounter(parts[5].to_string()))?;

        Ok((board, active))
    }

    /// Serialize to FEN. Round-trips exactly with `from_fen` for piece
    /// placement, castling letters and the en-passant square.
    pub fn to_fen(&self, active: Color) -> String {
        let placement = (0..8)
            .rev()
            .map(|rank| {
                let mut row = String::new();
                let mut empty_run = 0;
                for file in 0..8 {
                    match self.piece_and_color_at(sq_to_bb(rank * 8 + file)) {
                        Some((piece, color)) => {
                            if empty_run > 0 {
                                row.push_str(&empty_run.to_string());
                                empty_run = 0;
                            }
                            row.push(piece.to_fen_char(color));
                        }
                        None => empty_run += 1,
                    }
                }
                if empty_run > 0 {
                    row.push_str(&empty_run.to_string());
                }
                row
            })
            .join("/");

        let mut castling = String::new();
        if self.castling.white_kingside {
            castling.push('K');
        }
        if self.castling.white_queenside {
            castling.push('Q');
        }
        if self.castling.black_kingside {
            castling.push('k');
        }
        if self.castling.black_queenside {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = if self.en_passant == 0 {
            "-".to_string()
        } else {
            square_name(bb_to_sq(self.en_passant))
        };

        format!(
            "{} {} {} {} {} {}",
            placement,
            active.to_fen_char(),
            castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// ASCII rendering for diagnostics, rank 8 at the top.
    pub fn draw_board(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            out.push_str(&format!("{} | ", rank + 1));
            for file in 0..8 {
                match self.piece_and_color_at(sq_to_bb(rank * 8 + file)) {
                    Some((piece, color)) => out.push(piece.to_fen_char(color)),
                    None => out.push('.'),
                }
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  +----------------\n");
        out.push_str("    a b c d e f g h\n");
        out
    }
}
