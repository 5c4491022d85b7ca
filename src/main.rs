use std::env;
use std::process::exit;

use anyhow::Result;

use connect4_solver::*;

const USAGE: &str = "\
Usage: connect4_solver MOVES [PLY_TABLE PLY]

  MOVES      the position as 1-indexed column digits, e.g. 4455;
             pass '' for the empty board
  PLY_TABLE  optional file of solved positions to shortcut the search
  PLY        the move count the table holds positions for";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let moves = match args.get(0) {
        Some(moves) => moves,
        None => {
            eprintln!("{}", USAGE);
            exit(2);
        }
    };

    let config = BoardConfig::new(DEFAULT_HEIGHT, DEFAULT_WIDTH)?;
    let position = Position::from_move_sequence(config, moves)?;

    let mut solver = Solver::new(config);
    if let (Some(path), Some(ply)) = (args.get(1), args.get(2)) {
        let ply = ply.parse()?;
        if let Some(table) = PlyLookupTable::load_or_disabled(path, ply) {
            solver = solver.with_ply_table(table);
        }
    }

    print!("{}", position);
    let solution = solver.find_optimal_moves(position);

    println!(
        "strong score: {}, optimal moves: {}",
        solution.strong_score(),
        format_columns(solution.strong_moves())
    );
    match solution.weak_score() {
        1 => println!(
            "the player to move wins; winning moves: {}",
            format_columns(solution.weak_moves())
        ),
        0 => println!(
            "the game is drawn; drawing moves: {}",
            format_columns(solution.weak_moves())
        ),
        _ => println!("the player to move loses against perfect play"),
    }
    println!("nodes searched: {}", solver.node_count);

    Ok(())
}

/// Formats 0-indexed columns as the 1-indexed digits used for input
fn format_columns(columns: &[usize]) -> String {
    let digits: Vec<String> = columns.iter().map(|col| (col + 1).to_string()).collect();
    digits.join(", ")
}
