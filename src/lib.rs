//! A strong and weak solver for the board game 'Connect 4'
//!
//! Positions are held as bitboards and solved exactly with an optimised
//! negamax search: alpha-beta pruning driven by distance-to-terminal
//! bounds, null-window iterative narrowing, heuristic move ordering, a
//! fixed-capacity transposition cache and an optional table of precomputed
//! positions at a fixed ply depth.
//!
//! # Basic usage
//!
//! ```
//! use connect4_solver::{BoardConfig, Position, SolveMode, Solver};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = BoardConfig::new(6, 7)?;
//! let position = Position::from_move_sequence(config, "112233")?;
//!
//! let mut solver = Solver::new(config);
//! assert_eq!(solver.solve(position, SolveMode::Strong), 18);
//! # Ok(())
//! # }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod config;

pub mod position;

pub mod transposition;

pub mod ply_table;

pub mod solution;

pub mod solver;


pub use crate::config::BoardConfig;
pub use crate::ply_table::PlyLookupTable;
pub use crate::position::Position;
pub use crate::solution::SolvedPosition;
pub use crate::solver::{SolveMode, Solver};
pub use crate::transposition::TranspositionCache;

/// The height of the standard game board in cells
pub const DEFAULT_HEIGHT: usize = 6;

/// The width of the standard game board in cells
pub const DEFAULT_WIDTH: usize = 7;

// ensure the default dimensions fit in a u64 for the bitboard representation
const_assert!(DEFAULT_WIDTH * (DEFAULT_HEIGHT + 1) < 64);
