//! Fixed-depth minimax with alpha-beta pruning and a parallel root split.
//!
//! Scores are signed and white-positive at every node. Parallelism exists
//! only at the root: the legal move list is partitioned into contiguous
//! chunks and each chunk is searched by an independent worker that rebuilds
//! its own board from a FEN snapshot with a fresh full-width window. No
//! pruning information crosses chunk boundaries, so chunks trade some
//! cutoffs for fully independent workers.

use itertools::Itertools;
use rayon::prelude::*;
use tracing::debug;

use crate::board::Board;
use crate::evaluate::evaluate;
use crate::movegen::{generate_legal, generate_pseudo_legal, is_square_attacked};
use crate::moves::{make_move, unmake_move};
use crate::types::{Color, Move, PieceType};

pub const MAX_SCORE: i32 = i32::MAX;
pub const MIN_SCORE: i32 = -i32::MAX;

/// Base magnitude for mate scores. The remaining search depth is added on
/// top so that mates found closer to the root score more extreme, steering
/// the engine toward the shortest mate.
pub const MATE_SCORE: i32 = 1_000_000;

#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
}

/// MVV-LVA ordering score: captures are worth ten times the victim minus the
/// attacker, quiet moves are zero. En passant counts as a pawn capture.
fn mvv_lva(board: &Board, mv: Move, color: Color) -> i32 {
    let Some(attacker) = board.piece_at(mv.from, color) else {
        return 0;
    };
    let victim = if let Some(captured) = board.piece_at(mv.to, color.other()) {
        captured.value()
    } else if attacker == PieceType::Pawn && board.en_passant != 0 && mv.to == board.en_passant {
        PieceType::Pawn.value()
    } else {
        return 0;
    };
    victim * 10 - attacker.value()
}

/// Order moves for expansion: descending capture scores for the maximizer,
/// ascending for the minimizer.
fn order_moves(board: &Board, moves: Vec<Move>, color: Color) -> Vec<Move> {
    match color {
        Color::White => moves
            .into_iter()
            .sorted_by_key(|&mv| -mvv_lva(board, mv, color))
            .collect(),
        Color::Black => moves
            .into_iter()
            .sorted_by_key(|&mv| mvv_lva(board, mv, color))
            .collect(),
    }
}

/// Alpha-beta over pseudo-legal moves with a king-safety probe per child.
/// Returns the static evaluation at depth 0 and a mate/stalemate score at
/// nodes with no legal move.
pub fn alpha_beta(board: &mut Board, depth: u8, mut alpha: i32, mut beta: i32, to_move: Color) -> i32 {
    if depth == 0 {
        return evaluate(board);
    }

    let enemy = to_move.other();
    let moves = order_moves(board, generate_pseudo_legal(board, to_move), to_move);

    let mut found_legal = false;
    let mut best = match to_move {
        Color::White => MIN_SCORE,
        Color::Black => MAX_SCORE,
    };

    for mv in moves {
        let record = make_move(board, mv, to_move);
        if is_square_attacked(board, board.king(to_move), enemy) {
            unmake_move(board, record);
            continue;
        }
        found_legal = true;
        let score = alpha_beta(board, depth - 1, alpha, beta, enemy);
        unmake_move(board, record);

        match to_move {
            Color::White => {
                best = best.max(score);
                alpha = alpha.max(best);
            }
            Color::Black => {
                best = best.min(score);
                beta = beta.min(best);
            }
        }
        if beta <= alpha {
            break;
        }
    }

    if !found_legal {
        return terminal_score(board, depth, to_move);
    }
    best
}

/// Score for a node whose side to move has no legal reply: mate against the
/// checked side, biased by remaining depth, or a draw when not in check.
fn terminal_score(board: &Board, depth: u8, to_move: Color) -> i32 {
    if is_square_attacked(board, board.king(to_move), to_move.other()) {
        match to_move {
            Color::White => -(MATE_SCORE + depth as i32),
            Color::Black => MATE_SCORE + depth as i32,
        }
    } else {
        0
    }
}

/// Search one contiguous chunk of root moves on a private board rebuilt from
/// the FEN snapshot, with an independent full-width window.
fn search_chunk(fen: &str, chunk: &[Move], depth: u8, to_move: Color) -> SearchResult {
    let (mut board, _) = Board::from_fen(fen).expect("root snapshot FEN must parse");
    let enemy = to_move.other();
    let mut alpha = MIN_SCORE;
    let mut beta = MAX_SCORE;
    let mut best: Option<SearchResult> = None;

    for &mv in chunk {
        let record = make_move(&mut board, mv, to_move);
        let score = alpha_beta(&mut board, depth - 1, alpha, beta, enemy);
        unmake_move(&mut board, record);

        let better = match (to_move, best) {
            (_, None) => true,
            (Color::White, Some(b)) => score > b.score,
            (Color::Black, Some(b)) => score < b.score,
        };
        if better {
            best = Some(SearchResult {
                best_move: mv,
                score,
            });
        }
        match to_move {
            Color::White => alpha = alpha.max(score),
            Color::Black => beta = beta.min(score),
        }
    }

    let result = best.expect("root chunks are never empty");
    debug!(
        "chunk of {} root moves searched: best {} score {}",
        chunk.len(),
        result.best_move,
        result.score
    );
    result
}

/// Pick the best move for `to_move` at fixed `depth`.
///
/// The root legal-move list is split into `workers` contiguous chunks (the
/// rayon pool width when unspecified) and the chunk results are folded with
/// a commutative max/min, so chunk completion order never matters. Returns
/// `None` when the side to move has no legal move at all.
pub fn find_best_move(
    board: &Board,
    to_move: Color,
    depth: u8,
    workers: Option<usize>,
) -> Option<SearchResult> {
    let depth = depth.max(1);
    let mut probe = *board;
    let legal = generate_legal(&mut probe, to_move);
    if legal.is_empty() {
        return None;
    }

    let workers = workers
        .unwrap_or_else(rayon::current_num_threads)
        .clamp(1, legal.len());
    // Ceiling division keeps the chunks equal-sized and the last one nonempty.
    let chunk_size = (legal.len() + workers - 1) / workers;
    let fen = board.to_fen(to_move);

    let results: Vec<SearchResult> = legal
        .par_chunks(chunk_size)
        .map(|chunk| search_chunk(&fen, chunk, depth, to_move))
        .collect();

    match to_move {
        Color::White => results.into_iter().max_by_key(|r| r.score),
        Color::Black => results.into_iter().min_by_key(|r| r.score),
    }
}
