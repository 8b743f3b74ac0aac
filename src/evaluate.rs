//! Static evaluation: material plus piece-square tables, white-positive.

use crate::bitboard::BitboardIter;
use crate::board::Board;
use crate::types::{Color, PieceType};

/// Evaluate a position in centipawns. Positive favors white.
pub fn evaluate(board: &Board) -> i32 {
    let endgame = is_endgame(board);
    side_score(board, Color::White, endgame) - side_score(board, Color::Black, endgame)
}

fn side_score(board: &Board, color: Color, endgame: bool) -> i32 {
    let mut score = 0;
    for piece in PieceType::ALL {
        for sq in BitboardIter(board.pieces_of(color, piece)) {
            score += piece.value() + pst_value(piece, color, sq, endgame);
        }
    }
    score
}

/// Positional bonus for a piece on a square. Tables are stored from white's
/// perspective with rank 8 first, so white squares flip ranks and black
/// squares index directly; black's home rank reads the same values as
/// white's.
pub fn pst_value(piece: PieceType, color: Color, sq: u8, endgame: bool) -> i32 {
    let table = raw_table(piece, endgame);
    let index = match color {
        Color::White => sq ^ 56,
        Color::Black => sq,
    };
    table[index as usize]
}

fn raw_table(piece: PieceType, endgame: bool) -> &'static [i32; 64] {
    match piece {
        PieceType::Pawn => &PAWNS,
        PieceType::Knight => &KNIGHTS,
        PieceType::Bishop => &BISHOPS,
        PieceType::Rook => &ROOKS,
        PieceType::Queen => &QUEENS,
        PieceType::King => {
            if endgame {
                &KING_END
            } else {
                &KING_START
            }
        }
    }
}

/// The king table switches to its endgame variant when no side has a queen,
/// or when every side that still has a queen has no rooks and at most one
/// minor piece.
pub fn is_endgame(board: &Board) -> bool {
    [Color::White, Color::Black].into_iter().all(|color| {
        if board.pieces_of(color, PieceType::Queen) == 0 {
            return true;
        }
        let minors = board.pieces_of(color, PieceType::Knight)
            | board.pieces_of(color, PieceType::Bishop);
        board.pieces_of(color, PieceType::Rook) == 0 && minors.count_ones() <= 1
    })
}

const PAWNS: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    50, 50, 50, 50, 50, 50, 50, 50, //
    10, 10, 20, 30, 30, 20, 10, 10, //
    5, 5, 10, 25, 25, 10, 5, 5, //
    0, 0, 0, 20, 20, 0, 0, 0, //
    5, -5, -10, 0, 0, -10, -5, 5, //
    5, 10, 10, -20, -20, 10, 10, 5, //
    0, 0, 0, 0, 0, 0, 0, 0,
];

const KNIGHTS: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, //
    -40, -20, 0, 0, 0, 0, -20, -40, //
    -30, 0, 10, 15, 15, 10, 0, -30, //
    -30, 5, 15, 20, 20, 15, 5, -30, //
    -30, 0, 15, 20, 20, 15, 0, -30, //
    -30, 5, 10, 15, 15, 10, 5, -30, //
    -40, -20, 0, 5, 5, 0, -20, -40, //
    -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOPS: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -10, 0, 5, 10, 10, 5, 0, -10, //
    -10, 5, 5, 10, 10, 5, 5, -10, //
    -10, 0, 10, 10, 10, 10, 0, -10, //
    -10, 10, 10, 10, 10, 10, 10, -10, //
    -10, 5, 0, 0, 0, 0, 5, -10, //
    -20, -10, -10, -10, -10, -10, -10, -20,
];

const ROOKS: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, //
    5, 10, 10, 10, 10, 10, 10, 5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    -5, 0, 0, 0, 0, 0, 0, -5, //
    0, 0, 0, 5, 5, 0, 0, 0,
];

const QUEENS: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20, //
    -10, 0, 0, 0, 0, 0, 0, -10, //
    -10, 0, 5, 5, 5, 5, 0, -10, //
    -5, 0, 5, 5, 5, 5, 0, -5, //
    0, 0, 5, 5, 5, 5, 0, -5, //
    -10, 5, 5, 5, 5, 5, 0, -10, //
    -10, 0, 5, 0, 0, 0, 0, -10, //
    -20, -10, -10, -5, -5, -10, -10, -20,
];

const KING_START: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -20, -30, -30, -40, -40, -30, -30, -20, //
    -10, -20, -20, -20, -20, -20, -20, -10, //
    20, 20, 0, 0, 0, 0, 20, 20, //
    20, 30, 10, 0, 0, 10, 30, 20,
];

const KING_END: [i32; 64] = [
    -50, -40, -30, -20, -20, -30, -40, -50, //
    -30, -20, -10, 0, 0, -10, -20, -30, //
    -30, -10, 20, 30, 30, 20, -10, -30, //
    -30, -10, 30, 40, 40, 30, -10, -30, //
    -30, -10, 30, 40, 40, 30, -10, -30, //
    -30, -10, 20, 30, 30, 20, -10, -30, //
    -30, -30, 0, 0, 0, 0, -30, -30, //
    -50, -30, -30, -30, -30, -30, -30, -50,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::square_index;

    #[test]
    fn start_position_is_balanced() {
        assert_eq!(evaluate(&Board::new_game()), 0);
    }

    #[test]
    fn pst_mirrors_between_colors() {
        // A white pawn on e2 and a black pawn on e7 sit on mirrored squares
        // and must read the same table value. Same for every square.
        for sq in 0..64u8 {
            let mirrored = sq ^ 56;
            for piece in PieceType::ALL {
                assert_eq!(
                    pst_value(piece, Color::White, sq, false),
                    pst_value(piece, Color::Black, mirrored, false)
                );
            }
        }
        let e2 = square_index("e2").unwrap();
        let e4 = square_index("e4").unwrap();
        // Advancing the king's pawn gains table value.
        assert!(
            pst_value(PieceType::Pawn, Color::White, e4, false)
                > pst_value(PieceType::Pawn, Color::White, e2, false)
        );
    }

    #[test]
    fn material_advantage_shows_in_score() {
        // White is up a queen for a rook.
        let (board, _) = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        assert!(evaluate(&board) > 300);
        let (board, _) = Board::from_fen("q3k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&board) < -300);
    }

    #[test]
    fn endgame_rule_follows_queens_and_escorts() {
        // Start position: queens with full escorts, not an endgame.
        assert!(!is_endgame(&Board::new_game()));
        // No queens at all.
        let (board, _) = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert!(is_endgame(&board));
        // Queen with a single minor and no rooks still counts as an endgame.
        let (board, _) = Board::from_fen("4k3/8/8/8/8/8/8/Q2NK3 w - - 0 1").unwrap();
        assert!(is_endgame(&board));
        // A queen escorted by a rook does not.
        let (board, _) = Board::from_fen("4k3/8/8/8/8/8/8/Q2RK3 w - - 0 1").unwrap();
        assert!(!is_endgame(&board));
        // Both sides must qualify.
        let (board, _) = Board::from_fen("q3kr2/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(!is_endgame(&board));
    }
}
