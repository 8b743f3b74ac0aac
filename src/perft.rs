//! Perft: the correctness oracle for the move generator and move handler.
//!
//! Counts leaf nodes of the legal move tree at a fixed depth by making and
//! unmaking every legal move. The counts from the starting position are
//! known exactly (https://www.chessprogramming.org/Perft_Results), so any
//! generation or make/unmake defect shows up as a wrong total.

use crate::board::Board;
use crate::movegen::generate_legal;
use crate::moves::{make_move, unmake_move};
use crate::types::Color;

/// Leaf-node count at `depth` for `color` to move. Depth 0 is one node.
pub fn perft(board: &mut Board, depth: u8, color: Color) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mv in generate_legal(board, color) {
        let record = make_move(board, mv, color);
        nodes += perft(board, depth - 1, color.other());
        unmake_move(board, record);
    }
    nodes
}

/// Expected node counts from the standard initial position.
///
/// | Depth | Nodes       |
/// | ----- | ----------- |
/// | 0     | 1           |
/// | 1     | 20          |
/// | 2     | 400         |
/// | 3     | 8,902       |
/// | 4     | 197,281     |
/// | 5     | 4,865,609   |
fn expected_start_nodes(depth: u8) -> u64 {
    match depth {
        0 => 1,
        1 => 20,
        2 => 400,
        3 => 8_902,
        4 => 197_281,
        5 => 4_865_609,
        _ => panic!("no expected node count recorded for depth {depth}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perft_start_position_exact_counts() {
        let mut board = Board::new_game();
        for depth in 0..=4 {
            assert_eq!(
                perft(&mut board, depth, Color::White),
                expected_start_nodes(depth),
                "wrong node count at depth {depth}"
            );
            // The probe tree must leave the board untouched.
            assert_eq!(board, Board::new_game());
        }
    }

    #[test]
    #[ignore = "slow; run with --ignored for the full check"]
    fn perft_start_position_depth_5() {
        let mut board = Board::new_game();
        assert_eq!(perft(&mut board, 5, Color::White), expected_start_nodes(5));
    }

    #[test]
    fn perft_is_symmetric_for_black_start() {
        // The initial position mirrors perfectly, so black to move counts the
        // same trees.
        let (mut board, _) =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert_eq!(perft(&mut board, 3, Color::Black), 8_902);
    }
}
