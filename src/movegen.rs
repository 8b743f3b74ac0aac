//! Legal move generation.
//!
//! Generation is pseudo-legal first: every piece emits one move per attacked
//! target bit, castling is appended when its preconditions hold, and king
//! safety is then verified by making each move, probing the square-attacked
//! oracle, and unmaking. No pin detection is attempted.

use crate::attacks;
use crate::bitboard::{bb_to_sq, sq_to_bb, BitboardIter, Bitboard, NOT_A_FILE, NOT_H_FILE};
use crate::board::Board;
use crate::magic;
use crate::moves::{make_move, unmake_move};
use crate::types::{CastleSide, Color, Move, PieceType, Status};

/// All moves obeying piece movement rules for `color`, before king-safety
/// filtering.
pub fn generate_pseudo_legal(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for piece in PieceType::ALL {
        for from_sq in BitboardIter(board.pieces_of(color, piece)) {
            let from = sq_to_bb(from_sq);
            let targets = attacks::attacks(piece, from, color, board);
            for to_sq in BitboardIter(targets) {
                moves.push(Move::new(from, sq_to_bb(to_sq)));
            }
        }
    }
    for side in CastleSide::BOTH {
        if can_castle(board, color, side) {
            let king = board.king(color);
            let to = match side {
                CastleSide::Kingside => king << 2,
                CastleSide::Queenside => king >> 2,
            };
            moves.push(Move::new(king, to));
        }
    }
    moves
}

/// Castling is available when the right is still held, the squares between
/// king and rook are empty, and no square the king stands on or crosses is
/// attacked. The queenside b-file square must be empty but may be attacked:
/// only the rook crosses it.
pub fn can_castle(board: &Board, color: Color, side: CastleSide) -> bool {
    if !board.castling.get(color, side) {
        return false;
    }
    let king = board.king(color);
    let occupied = board.occupied();
    let enemy = color.other();
    let (between, king_path) = match side {
        CastleSide::Kingside => ((king << 1) | (king << 2), king | (king << 1) | (king << 2)),
        CastleSide::Queenside => (
            (king >> 1) | (king >> 2) | (king >> 3),
            king | (king >> 1) | (king >> 2),
        ),
    };
    if between & occupied != 0 {
        return false;
    }
    BitboardIter(king_path).all(|sq| !is_square_attacked(board, sq_to_bb(sq), enemy))
}

/// Is `square` attacked by any piece of color `by`? Works backwards from the
/// square: a pawn of `by` attacks it iff the square's reverse pawn diagonal
/// hits one, and the symmetric knight/king/slider attack sets from the
/// square are intersected with `by`'s pieces of each type.
pub fn is_square_attacked(board: &Board, square: Bitboard, by: Color) -> bool {
    let pawn_origins = match by {
        Color::White => ((square >> 7) & NOT_A_FILE) | ((square >> 9) & NOT_H_FILE),
        Color::Black => ((square << 7) & NOT_H_FILE) | ((square << 9) & NOT_A_FILE),
    };
    if pawn_origins & board.pieces_of(by, PieceType::Pawn) != 0 {
        return true;
    }

    if attacks::knight_attacks(square, 0) & board.pieces_of(by, PieceType::Knight) != 0 {
        return true;
    }
    if attacks::king_attacks(square, 0) & board.pieces_of(by, PieceType::King) != 0 {
        return true;
    }

    let sq = bb_to_sq(square);
    let occupied = board.occupied();
    let queens = board.pieces_of(by, PieceType::Queen);
    if magic::bishop_attacks(sq, occupied) & (board.pieces_of(by, PieceType::Bishop) | queens) != 0
    {
        return true;
    }
    if magic::rook_attacks(sq, occupied) & (board.pieces_of(by, PieceType::Rook) | queens) != 0 {
        return true;
    }

    false
}

/// Pseudo-legal moves filtered by king safety: each candidate is made, the
/// mover's own king probed, and the move unmade.
pub fn generate_legal(board: &mut Board, color: Color) -> Vec<Move> {
    let enemy = color.other();
    generate_pseudo_legal(board, color)
        .into_iter()
        .filter(|&mv| {
            let record = make_move(board, mv, color);
            let safe = !is_square_attacked(board, board.king(color), enemy);
            unmake_move(board, record);
            safe
        })
        .collect()
}

/// Terminal detection for the side to move: no legal moves means checkmate
/// when the king is attacked and stalemate when it is not.
pub fn game_status(board: &mut Board, color: Color) -> Status {
    if !generate_legal(board, color).is_empty() {
        return Status::Ongoing;
    }
    if is_square_attacked(board, board.king(color), color.other()) {
        Status::Checkmate(color.other())
    } else {
        Status::Stalemate
    }
}
