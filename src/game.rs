//! Self-play driver: the engine playing both sides at a fixed depth.
//!
//! This is the in-crate consumer of the engine's public surface (the GUI of
//! the full application talks to the same three seams: the legal move list,
//! the move handler and the search).

use chrono::prelude::*;
use std::time::Instant;
use tracing::info;

use crate::board::{Board, STARTING_POSITION_FEN};
use crate::errors::ParseFenError;
use crate::movegen::game_status;
use crate::moves::make_move;
use crate::search::find_best_move;
use crate::types::{Color, Move, Status};

pub struct Game {
    board: Board,
    to_move: Color,
    max_depth: u8,
    workers: Option<usize>,
    moves: Vec<Move>,
    game_start_time: DateTime<Local>,
}

impl Game {
    pub fn new(max_depth: u8) -> Self {
        Game::from_fen(max_depth, STARTING_POSITION_FEN).expect("starting position FEN is valid")
    }

    pub fn from_fen(max_depth: u8, fen: &str) -> Result<Self, ParseFenError> {
        let (board, to_move) = Board::from_fen(fen)?;
        Ok(Game {
            board,
            to_move,
            max_depth,
            workers: None,
            moves: Vec::new(),
            game_start_time: Local::now(),
        })
    }

    /// Fix the number of root-split workers instead of using the pool width.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves_played(&self) -> &[Move] {
        &self.moves
    }

    /// Play until mate, stalemate or the move cap. Returns the final status
    /// (`Ongoing` when the cap cut the game short).
    pub fn play(&mut self, max_moves: u32) -> Status {
        info!(
            "game started at {} (depth {})",
            self.game_start_time.format("%Y-%m-%d %H:%M:%S"),
            self.max_depth
        );

        for _ in 0..(2 * max_moves) {
            let now = Instant::now();
            let Some(result) = find_best_move(&self.board, self.to_move, self.max_depth, self.workers)
            else {
                let status = game_status(&mut self.board, self.to_move);
                match status {
                    Status::Checkmate(winner) => info!("checkmate, {} wins", winner.to_human()),
                    Status::Stalemate => info!("stalemate, draw"),
                    Status::Ongoing => unreachable!("no best move implies a terminal status"),
                }
                return status;
            };

            info!(
                "{} plays {} (score {}, {:.3}s)",
                self.to_move.to_human(),
                result.best_move,
                result.score,
                now.elapsed().as_secs_f32()
            );
            make_move(&mut self.board, result.best_move, self.to_move);
            self.moves.push(result.best_move);
            self.to_move = self.to_move.other();
        }
        Status::Ongoing
    }

    /// Coordinate-notation transcript, e.g. `e2e4 e7e5 g1f3`.
    pub fn transcript(&self) -> String {
        self.moves
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_game_records_moves() {
        let mut game = Game::new(1).with_workers(1);
        let status = game.play(2);
        assert_eq!(status, Status::Ongoing);
        assert_eq!(game.moves_played().len(), 4);
        assert_eq!(game.transcript().split(' ').count(), 4);
    }

    #[test]
    fn finished_game_reports_checkmate() {
        // White mates in one; the game must stop and name the winner.
        let mut game = Game::from_fen(2, "6k1/5ppp/8/8/8/8/5PPP/4R1K1 w - - 0 1")
            .unwrap()
            .with_workers(1);
        let status = game.play(10);
        assert_eq!(status, Status::Checkmate(Color::White));
        assert_eq!(game.moves_played().len(), 1);
    }
}
