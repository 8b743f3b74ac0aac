use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use munchkin::board::{Board, STARTING_POSITION_FEN};
use munchkin::evaluate::evaluate;
use munchkin::game::Game;
use munchkin::perft::perft;
use munchkin::search::find_best_move;
use munchkin::types::Color;

#[derive(Parser, Debug)]
#[command(name = "munchkin")]
#[command(about = "Bitboard chess engine with magic-bitboard move generation")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Engine self-play at a fixed depth
    Play {
        /// Search depth in plies
        #[arg(long, default_value_t = 4)]
        depth: u8,

        /// Stop after this many full moves
        #[arg(long, default_value_t = 40)]
        max_moves: u32,

        /// Start position, standard initial position when omitted
        #[arg(long)]
        fen: Option<String>,

        /// Root-split workers, rayon pool width when omitted
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Count leaf nodes of the legal-move generator
    Perft {
        #[arg(long, default_value_t = 4)]
        depth: u8,

        #[arg(long)]
        fen: Option<String>,
    },

    /// Static evaluation and best move for a position
    Eval {
        #[arg(long)]
        fen: String,

        #[arg(long, default_value_t = 4)]
        depth: u8,

        /// Search for this side instead of the FEN's side to move
        #[arg(long)]
        side: Option<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Play {
            depth,
            max_moves,
            fen,
            workers,
        } => {
            let fen = fen.unwrap_or_else(|| STARTING_POSITION_FEN.to_string());
            let mut game = Game::from_fen(depth, &fen)?;
            if let Some(workers) = workers {
                game = game.with_workers(workers);
            }
            let status = game.play(max_moves);
            println!("{}", game.board().draw_board());
            println!("{:?}", status);
            println!("{}", game.transcript());
        }

        Command::Perft { depth, fen } => {
            let fen = fen.unwrap_or_else(|| STARTING_POSITION_FEN.to_string());
            let (mut board, color) = Board::from_fen(&fen)?;
            let start = Instant::now();
            let nodes = perft(&mut board, depth, color);
            let elapsed = start.elapsed().as_secs_f64();
            println!("depth: {depth}");
            println!("nodes: {nodes}");
            println!("time: {elapsed:.2}s");
            println!("nps: {:.0}", nodes as f64 / elapsed);
        }

        Command::Eval { fen, depth, side } => {
            let (board, active) = Board::from_fen(&fen)?;
            let to_move = match side {
                Some(side) => side.parse::<Color>()?,
                None => active,
            };
            println!("{}", board.draw_board());
            println!("static eval: {}", evaluate(&board));
            match find_best_move(&board, to_move, depth, None) {
                Some(result) => println!(
                    "best move for {}: {} (score {})",
                    to_move.to_human(),
                    result.best_move,
                    result.score
                ),
                None => println!("{} has no legal moves", to_move.to_human()),
            }
        }
    }

    Ok(())
}
