//! Attack generation: pure functions from (piece bitboard, color, board) to
//! the set of attacked squares.
//!
//! Knight, king and pawn attacks are computed setwise with fixed shift
//! offsets. Every shift that can cross a board edge is guarded by a not-file
//! mask applied to the shifted result, so a piece on the a-file never
//! projects onto the h-file and vice versa. Sliding pieces go through the
//! magic tables.

use crate::bitboard::{
    BitboardIter, Bitboard, NOT_AB_FILES, NOT_A_FILE, NOT_GH_FILES, NOT_H_FILE, RANK_2, RANK_7,
};
use crate::board::Board;
use crate::magic;
use crate::types::{Color, PieceType};

/// Squares attacked by a set of knights, own pieces excluded.
pub fn knight_attacks(knights: Bitboard, own: Bitboard) -> Bitboard {
    let attacks = ((knights << 17) & NOT_A_FILE)
        | ((knights >> 17) & NOT_H_FILE)
        | ((knights << 15) & NOT_H_FILE)
        | ((knights >> 15) & NOT_A_FILE)
        | ((knights << 10) & NOT_AB_FILES)
        | ((knights >> 10) & NOT_GH_FILES)
        | ((knights << 6) & NOT_GH_FILES)
        | ((knights >> 6) & NOT_AB_FILES);
    attacks & !own
}

/// Squares attacked by a king, own pieces excluded.
pub fn king_attacks(kings: Bitboard, own: Bitboard) -> Bitboard {
    let attacks = ((kings << 1) & NOT_A_FILE)
        | ((kings >> 1) & NOT_H_FILE)
        | ((kings << 9) & NOT_A_FILE)
        | ((kings >> 9) & NOT_H_FILE)
        | ((kings << 7) & NOT_H_FILE)
        | ((kings >> 7) & NOT_A_FILE)
        | (kings << 8)
        | (kings >> 8);
    attacks & !own
}

/// Raw diagonal capture squares of a set of pawns, regardless of what
/// occupies them. Used both for move generation (intersected with enemy
/// pieces and the en-passant target) and, reversed, by the square-attacked
/// oracle.
pub fn pawn_capture_targets(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => ((pawns << 9) & NOT_A_FILE) | ((pawns << 7) & NOT_H_FILE),
        Color::Black => ((pawns >> 9) & NOT_H_FILE) | ((pawns >> 7) & NOT_A_FILE),
    }
}

/// Pawn destinations: single pushes onto empty squares, double pushes from
/// the home rank when the single push succeeded, diagonal captures onto
/// enemy pieces, and the en-passant capture when the board's target square
/// intersects the diagonal attack set.
pub fn pawn_moves(pawns: Bitboard, color: Color, board: &Board) -> Bitboard {
    let occupied = board.occupied();
    let enemy = board.occupied_by(color.other());
    let captures = pawn_capture_targets(pawns, color) & (enemy | board.en_passant);
    match color {
        Color::White => {
            let single = (pawns << 8) & !occupied;
            let double = ((((pawns & RANK_2) << 8) & !occupied) << 8) & !occupied;
            single | double | captures
        }
        Color::Black => {
            let single = (pawns >> 8) & !occupied;
            let double = ((((pawns & RANK_7) >> 8) & !occupied) >> 8) & !occupied;
            single | double | captures
        }
    }
}

/// Union of magic rook attacks from every rook in the set, own excluded.
pub fn rook_attacks(rooks: Bitboard, own: Bitboard, occupied: Bitboard) -> Bitboard {
    BitboardIter(rooks).fold(0, |acc, sq| acc | magic::rook_attacks(sq, occupied)) & !own
}

/// Union of magic bishop attacks from every bishop in the set, own excluded.
pub fn bishop_attacks(bishops: Bitboard, own: Bitboard, occupied: Bitboard) -> Bitboard {
    BitboardIter(bishops).fold(0, |acc, sq| acc | magic::bishop_attacks(sq, occupied)) & !own
}

/// Queen attacks are rook union bishop attacks from the same squares.
pub fn queen_attacks(queens: Bitboard, own: Bitboard, occupied: Bitboard) -> Bitboard {
    BitboardIter(queens).fold(0, |acc, sq| acc | magic::queen_attacks(sq, occupied)) & !own
}

/// Attack set for any piece type; the single entry point the move generator
/// uses.
pub fn attacks(piece: PieceType, piece_bb: Bitboard, color: Color, board: &Board) -> Bitboard {
    let own = board.occupied_by(color);
    match piece {
        PieceType::Pawn => pawn_moves(piece_bb, color, board),
        PieceType::Knight => knight_attacks(piece_bb, own),
        PieceType::Bishop => bishop_attacks(piece_bb, own, board.occupied()),
        PieceType::Rook => rook_attacks(piece_bb, own, board.occupied()),
        PieceType::Queen => queen_attacks(piece_bb, own, board.occupied()),
        PieceType::King => king_attacks(piece_bb, own),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::{sq_to_bb, square_index};

    fn bb(name: &str) -> Bitboard {
        sq_to_bb(square_index(name).unwrap())
    }

    const A_FILE: Bitboard = 0x0101_0101_0101_0101;
    const H_FILE: Bitboard = 0x8080_8080_8080_8080;

    #[test]
    fn knight_in_center_hits_eight_squares() {
        let attacks = knight_attacks(bb("e4"), 0);
        assert_eq!(attacks.count_ones(), 8);
        for target in ["d2", "f2", "c3", "g3", "c5", "g5", "d6", "f6"] {
            assert_ne!(attacks & bb(target), 0, "missing {target}");
        }
    }

    #[test]
    fn knight_on_corner_never_wraps() {
        let from_a1 = knight_attacks(bb("a1"), 0);
        assert_eq!(from_a1, bb("b3") | bb("c2"));
        assert_eq!(from_a1 & H_FILE, 0);

        let from_h1 = knight_attacks(bb("h1"), 0);
        assert_eq!(from_h1, bb("g3") | bb("f2"));
        assert_eq!(from_h1 & A_FILE, 0);

        let from_h8 = knight_attacks(bb("h8"), 0);
        assert_eq!(from_h8, bb("g6") | bb("f7"));
        assert_eq!(from_h8 & A_FILE, 0);
    }

    #[test]
    fn king_on_edges_never_wraps() {
        assert_eq!(king_attacks(bb("a1"), 0), bb("a2") | bb("b1") | bb("b2"));
        assert_eq!(king_attacks(bb("h4"), 0).count_ones(), 5);
        assert_eq!(king_attacks(bb("h4"), 0) & A_FILE, 0);
        assert_eq!(king_attacks(bb("a5"), 0) & H_FILE, 0);
        assert_eq!(king_attacks(bb("e4"), 0).count_ones(), 8);
    }

    #[test]
    fn pawn_capture_targets_never_wrap() {
        assert_eq!(pawn_capture_targets(bb("a2"), Color::White), bb("b3"));
        assert_eq!(pawn_capture_targets(bb("h2"), Color::White), bb("g3"));
        assert_eq!(pawn_capture_targets(bb("a7"), Color::Black), bb("b6"));
        assert_eq!(pawn_capture_targets(bb("h7"), Color::Black), bb("g6"));
        assert_eq!(pawn_capture_targets(bb("e4"), Color::White), bb("d5") | bb("f5"));
    }

    #[test]
    fn pawn_pushes_blocked_by_any_piece() {
        // A black knight on e3 stops the e2 pawn dead, including the double push.
        let (board, _) =
            Board::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_moves(bb("e2"), Color::White, &board), 0);

        // Blocked only on e4: the single push is available, the double is not.
        let (board, _) =
            Board::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_moves(bb("e2"), Color::White, &board), bb("e3"));
    }

    #[test]
    fn pawn_double_push_only_from_home_rank() {
        let (board, _) = Board::from_fen("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1").unwrap();
        assert_eq!(pawn_moves(bb("e3"), Color::White, &board), bb("e4"));
    }

    #[test]
    fn pawn_captures_only_enemy_pieces() {
        // White pawn e4; black pawn d5, white knight f5.
        let (board, _) =
            Board::from_fen("4k3/8/8/3p1N2/4P3/8/8/4K3 w - - 0 1").unwrap();
        let moves = pawn_moves(bb("e4"), Color::White, &board);
        assert_eq!(moves, bb("e5") | bb("d5"));
    }

    #[test]
    fn pawn_en_passant_target_joins_attack_set() {
        // Black just played d7d5; the white e5 pawn may capture on d6.
        let (board, _) =
            Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = pawn_moves(bb("e5"), Color::White, &board);
        assert_ne!(moves & bb("d6"), 0);
        assert_ne!(moves & bb("e6"), 0);
    }

    #[test]
    fn sliders_respect_own_and_enemy_blockers() {
        // White rook a1, white pawn a2, black pawn d1... use: rook e4 with own
        // pawn e6 and enemy pawn c4.
        let (board, _) =
            Board::from_fen("4k3/8/4P3/8/2p1R3/8/8/4K3 w - - 0 1").unwrap();
        let own = board.occupied_by(Color::White);
        let moves = rook_attacks(bb("e4"), own, board.occupied());
        assert_ne!(moves & bb("c4"), 0); // enemy blocker can be captured
        assert_eq!(moves & bb("b4"), 0); // shadowed
        assert_eq!(moves & bb("e6"), 0); // own piece excluded
        assert_ne!(moves & bb("e5"), 0);
    }

    #[test]
    fn queen_is_rook_union_bishop() {
        let (board, _) = Board::from_fen("4k3/8/8/8/4Q3/8/8/4K3 w - - 0 1").unwrap();
        let own = board.occupied_by(Color::White);
        let occupied = board.occupied();
        assert_eq!(
            queen_attacks(bb("e4"), own, occupied),
            rook_attacks(bb("e4"), own, occupied) | bishop_attacks(bb("e4"), own, occupied)
        );
    }
}
