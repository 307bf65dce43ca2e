use std::{
    io::{self, BufRead},
    path::PathBuf,
    process::exit,
    time::SystemTime,
};

use clap::Parser;
use log::{LevelFilter, debug, error};

use crate::{
    board::{index_8x8_to_pos_str, pretty_print_occupancy},
    game::{Game, GameOptions},
    input::{ClickCommand, parse_click_command},
    move_generator::generate_all_destinations,
    piece::piece_to_name,
};

mod bitboard;
mod board;
mod error;
mod game;
mod input;
mod move_generator;
mod movement;
mod piece;
mod selection;

#[derive(Parser, Debug)]
#[command(version, about = "Click driven chess board. Reads one clicked square per line from stdin.")]
struct Args {
    /// Starting position, the standard setup when left out
    #[arg(long)]
    fen: Option<String>,

    /// Only allow selecting pieces of the side to move
    #[arg(long)]
    enforce_turns: bool,

    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    /// Also write log messages to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print every pseudo legal move for the side to move and exit
    #[arg(long)]
    print_moves: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logger(args.log_level, args.log_file.as_ref()) {
        eprintln!("Failed to set up logging: {e}");
        exit(1);
    }
    log_panics::init();

    let options = GameOptions {
        enforce_turn_order: args.enforce_turns,
    };
    let mut game = match args.fen.as_deref().map(|fen| Game::from_fen(fen, options)) {
        None => Game::new(options),
        Some(Ok(game)) => game,
        Some(Err(e)) => {
            error!("{e}");
            exit(1);
        }
    };

    if args.print_moves {
        print_moves(&game);
        return;
    }

    draw(&mut game);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read from stdin: {e}");
                break;
            }
        };
        debug!("Received input '{line}'");

        let result = match parse_click_command(&line) {
            Some(ClickCommand::Square(square)) => game.handle_click(square),
            Some(ClickCommand::Grid(file, rank)) => game.handle_click_at(file, rank),
            Some(ClickCommand::Quit) => break,
            None => {
                error!(
                    "Could not understand '{line}', expected a square like e2, an index like 52 or coordinates like 4 6"
                );
                continue;
            }
        };

        match result {
            Ok(outcome) => {
                if let Some((from, to)) = outcome.moved {
                    match outcome.captured {
                        Some(captured) => println!(
                            "moved {}x{} capturing {}",
                            index_8x8_to_pos_str(from),
                            index_8x8_to_pos_str(to),
                            piece_to_name(captured.kind())
                        ),
                        None => println!("moved {}-{}", index_8x8_to_pos_str(from), index_8x8_to_pos_str(to)),
                    }
                }
                if game.needs_redraw() {
                    draw(&mut game);
                }
            }
            Err(e) => error!("Click rejected: {e}"),
        }
    }
}

fn draw(game: &mut Game) {
    let selection = game.selection();
    println!(
        "{}\n{}\n",
        pretty_print_occupancy(&game.current_occupancy(), selection.selected_square(), selection.destinations()),
        game.board().to_fen()
    );
    game.end_frame();
}

fn print_moves(game: &Game) {
    let board = game.board();
    let moves = generate_all_destinations(board, board.white_to_move);

    for (from, to) in &moves {
        println!("{}{}", index_8x8_to_pos_str(*from), index_8x8_to_pos_str(*to));
    }
    println!("\n{}", moves.len());
}

fn setup_logger(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;

    Ok(())
}
