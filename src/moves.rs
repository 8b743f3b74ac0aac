//! Apply and revert a single move against the board.
//!
//! Undo is a full snapshot, not a delta log: the board's piece array,
//! castling rights and en-passant target are copied before mutation and
//! restored verbatim afterwards. Records must be undone in reverse order of
//! their makes (stack discipline).

use crate::bitboard::{bb_to_sq, sq_to_bb, Bitboard, RANK_1, RANK_8};
use crate::board::{Board, CastlingRights};
use crate::types::{CastleSide, Color, Move, PieceType};

const A1: Bitboard = sq_to_bb(0);
const H1: Bitboard = sq_to_bb(7);
const A8: Bitboard = sq_to_bb(56);
const H8: Bitboard = sq_to_bb(63);

/// Everything needed to restore the board after a probe.
#[derive(Debug, Clone, Copy)]
pub struct UnmakeRecord {
    pieces: [[Bitboard; 6]; 2],
    castling: CastlingRights,
    en_passant: Bitboard,
}

/// A captured rook on its home corner invalidates that corner's castling
/// right; so does a rook leaving the corner. The square alone identifies the
/// right: any move touching a corner means the rook there is gone or moving.
fn clear_corner_right(castling: &mut CastlingRights, square: Bitboard) {
    match square {
        A1 => castling.clear(Color::White, CastleSide::Queenside),
        H1 => castling.clear(Color::White, CastleSide::Kingside),
        A8 => castling.clear(Color::Black, CastleSide::Queenside),
        H8 => castling.clear(Color::Black, CastleSide::Kingside),
        _ => {}
    }
}

/// Apply `mv` for `color`, returning the record that undoes it.
///
/// The move is trusted to come from the move generator; calling this with an
/// empty source square is a caller bug and panics.
pub fn make_move(board: &mut Board, mv: Move, color: Color) -> UnmakeRecord {
    let record = UnmakeRecord {
        pieces: board.pieces,
        castling: board.castling,
        en_passant: board.en_passant,
    };
    let enemy = color.other();

    let piece = board
        .piece_at(mv.from, color)
        .unwrap_or_else(|| panic!("no {} piece on the source square of {mv}", color.to_human()));

    // Captures. An en-passant capture removes the pawn one rank behind the
    // target square, not the (empty) target square itself.
    if piece == PieceType::Pawn && board.en_passant != 0 && mv.to == board.en_passant {
        let captured_square = match color {
            Color::White => mv.to >> 8,
            Color::Black => mv.to << 8,
        };
        board.clear_piece(captured_square, PieceType::Pawn, enemy);
    } else if let Some(captured) = board.remove_piece_at(mv.to, enemy) {
        if captured == PieceType::Rook {
            clear_corner_right(&mut board.castling, mv.to);
        }
    }

    // The en-passant target lives for exactly one reply: set it behind a
    // double push, clear it otherwise.
    let from_sq = bb_to_sq(mv.from);
    let to_sq = bb_to_sq(mv.to);
    board.en_passant = 0;
    if piece == PieceType::Pawn && from_sq.abs_diff(to_sq) == 16 {
        board.en_passant = sq_to_bb((from_sq + to_sq) / 2);
    }

    // Castling rights are monotone: moving the king forfeits both, moving a
    // rook off its corner forfeits that side.
    match piece {
        PieceType::King => board.castling.clear_both(color),
        PieceType::Rook => clear_corner_right(&mut board.castling, mv.from),
        _ => {}
    }

    // A king travelling two files is a castle; relocate the paired rook,
    // addressed relative to the king's target square.
    if piece == PieceType::King && from_sq.abs_diff(to_sq) == 2 {
        let (rook_from, rook_to) = if to_sq > from_sq {
            (mv.to << 1, mv.to >> 1) // kingside: h-file rook to the f-file
        } else {
            (mv.to >> 2, mv.to << 1) // queenside: a-file rook to the d-file
        };
        board.clear_piece(rook_from, PieceType::Rook, color);
        board.set_piece(rook_to, PieceType::Rook, color);
    }

    board.clear_piece(mv.from, piece, color);
    board.set_piece(mv.to, piece, color);

    // Auto-promotion: a pawn reaching the back rank becomes a queen.
    if piece == PieceType::Pawn {
        let back_rank = match color {
            Color::White => RANK_8,
            Color::Black => RANK_1,
        };
        if mv.to & back_rank != 0 {
            board.clear_piece(mv.to, PieceType::Pawn, color);
            board.set_piece(mv.to, PieceType::Queen, color);
        }
    }

    record
}

/// Restore the snapshotted state verbatim. Exact inverse of `make_move` when
/// records are unwound in reverse order.
pub fn unmake_move(board: &mut Board, record: UnmakeRecord) {
    board.pieces = record.pieces;
    board.castling = record.castling;
    board.en_passant = record.en_passant;
}
