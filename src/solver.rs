//! Negamax search with alpha-beta pruning, iterative window narrowing,
//! transposition caching and optional fixed-ply lookup

use crate::config::{BoardConfig, MAX_WIDTH};
use crate::ply_table::PlyLookupTable;
use crate::position::Position;
use crate::solution::SolvedPosition;
use crate::transposition::{TranspositionCache, DEFAULT_CACHE_CAPACITY};

/// Whether to compute the exact win-distance score or only the outcome
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolveMode {
    /// Exact score: how far a forced win is from the end of the game
    Strong,
    /// Outcome only: the returned score is meaningful in sign alone
    Weak,
}

/// Orders candidate moves by their heuristic score
///
/// Entries are insertion-sorted ascending as they arrive; iteration pops
/// from the top, so equal scores come out in reverse insertion order.
struct MoveSorter {
    size: usize,
    moves: [(u64, i32); MAX_WIDTH],
}

impl MoveSorter {
    fn new() -> Self {
        Self {
            size: 0,
            moves: [(0, 0); MAX_WIDTH],
        }
    }

    fn push(&mut self, move_mask: u64, score: i32) {
        let mut pos = self.size;
        self.size += 1;
        while pos != 0 && self.moves[pos - 1].1 > score {
            self.moves[pos] = self.moves[pos - 1];
            pos -= 1;
        }
        self.moves[pos] = (move_mask, score);
    }
}

impl Iterator for MoveSorter {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        match self.size {
            0 => None,
            _ => {
                self.size -= 1;
                Some(self.moves[self.size].0)
            }
        }
    }
}

/// A solver for Connect-Four positions
///
/// # Position scoring
/// A position is scored by how far a forced win is from the end of the
/// game: a player winning with their last possible disk scores 1 (or -1
/// for the second player), earlier wins score further from zero, and a
/// draw scores 0.
///
/// The transposition cache lives as long as the solver and is carried
/// across root queries; entries are keyed by exact position, so stale
/// bounds stay sound and memory is bounded by the fixed capacity. Call
/// [`clear_cache`] for a cold start.
///
/// [`clear_cache`]: Solver::clear_cache
pub struct Solver {
    config: BoardConfig,
    column_order: [usize; MAX_WIDTH],
    cache: TranspositionCache,
    ply_table: Option<PlyLookupTable>,

    /// The number of nodes searched so far, for diagnostics only
    pub node_count: usize,
}

impl Solver {
    /// Creates a solver with the default cache capacity
    pub fn new(config: BoardConfig) -> Self {
        Self::with_cache_capacity(config, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(config: BoardConfig, capacity: usize) -> Self {
        Self {
            config,
            column_order: config.column_order(),
            cache: TranspositionCache::new(capacity),
            ply_table: None,
            node_count: 0,
        }
    }

    /// Adds a table of solved fixed-ply positions to consult during search
    pub fn with_ply_table(mut self, table: PlyLookupTable) -> Self {
        self.ply_table = Some(table);
        self
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Empties the transposition cache
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Computes the score of a position
    ///
    /// Iteratively narrows the [min, max] window with null-window probes:
    /// each probe only answers whether the true score is above or below
    /// the pivot, and the window shrinks until both bounds meet.
    pub fn solve(&mut self, position: Position, mode: SolveMode) -> i32 {
        debug_assert_eq!(position.config(), &self.config);
        let board_size = self.config.board_size() as i32;
        let move_count = position.move_count() as i32;

        // an immediate win is never entered by the recursion, score it here
        if position.can_win_next() {
            return (board_size + 1 - move_count) / 2;
        }

        let (mut min, mut max) = match mode {
            SolveMode::Strong => (
                -(board_size - move_count) / 2,
                (board_size + 1 - move_count) / 2,
            ),
            SolveMode::Weak => (-1, 1),
        };

        while min < max {
            let mut med = min + (max - min) / 2;
            // snap the pivot toward zero to keep probes informative
            if med <= 0 && min / 2 < med {
                med = min / 2;
            } else if med >= 0 && max / 2 > med {
                med = max / 2;
            }

            let probe = self.negamax(position, med, med + 1);
            if probe <= med {
                max = probe;
            } else {
                min = probe;
            }
        }

        min
    }

    fn negamax(&mut self, position: Position, mut alpha: i32, mut beta: i32) -> i32 {
        self.node_count += 1;
        let board_size = self.config.board_size() as i32;
        let move_count = position.move_count() as i32;

        // exact value known without any search
        if let Some(table) = &self.ply_table {
            if move_count as usize == table.ply() {
                if let Some(score) = table.get(position.key()) {
                    return i32::from(score);
                }
            }
        }

        let non_losing_moves = position.non_losing_moves();
        if non_losing_moves == 0 {
            // every move hands the opponent an immediate win
            return -(board_size - move_count) / 2;
        }

        // with two cells left neither player can place a fourth disk
        if move_count >= board_size - 2 {
            return 0;
        }

        // the deepest possible loss from here bounds the score from below
        let min = -(board_size - 2 - move_count) / 2;
        if alpha < min {
            alpha = min;
            if alpha >= beta {
                return alpha;
            }
        }

        // the earliest possible win bounds the score from above; a cached
        // upper bound from an earlier visit tightens it further
        let mut max = (board_size - 1 - move_count) / 2;
        let cached = self.cache.get(position.key());
        if cached != 0 {
            max = i32::from(cached) + self.config.min_score() - 1;
        }
        if beta > max {
            beta = max;
            if alpha >= beta {
                return beta;
            }
        }

        // insert candidates in reversed static order so that among equal
        // heuristic scores the most central column is explored first
        let mut moves = MoveSorter::new();
        for i in (0..self.config.width()).rev() {
            let candidate = non_losing_moves & self.config.column_mask(self.column_order[i]);
            if candidate != 0 {
                moves.push(candidate, position.move_score(candidate));
            }
        }

        for move_mask in moves {
            let mut child = position;
            child.play(move_mask);
            let score = -self.negamax(child, -beta, -alpha);

            // a perfect opponent will never allow a branch this good
            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }

        // store the upper bound, offset so 0 stays the empty sentinel
        self.cache
            .put(position.key(), (alpha - self.config.min_score() + 1) as i8);
        alpha
    }

    /// Strongly solves every legal move of a position and aggregates the
    /// per-column scores into the strong and weak results
    pub fn find_optimal_moves(&mut self, position: Position) -> SolvedPosition {
        debug_assert_eq!(position.config(), &self.config);
        let board_size = self.config.board_size() as i32;
        let move_count = position.move_count() as i32;

        // each child is scored for the player left to move in it, so the
        // aggregation minimises over these opponent scores
        let mut move_scores = Vec::with_capacity(self.config.width());
        for column in 0..self.config.width() {
            if !position.legal_move(column) {
                continue;
            }
            let score = if position.is_winning_move(column) {
                -(board_size + 1 - move_count) / 2
            } else {
                let mut child = position;
                child.play_column(column);
                self.solve(child, SolveMode::Strong)
            };
            move_scores.push((column, score));
        }

        SolvedPosition::from_move_scores(position, &move_scores)
    }
}

#[cfg(test)]
mod tests {
    use super::MoveSorter;

    #[test]
    fn sorter_yields_highest_score_first() {
        let mut sorter = MoveSorter::new();
        sorter.push(0b001, 2);
        sorter.push(0b010, 5);
        sorter.push(0b100, 3);

        let order: Vec<u64> = sorter.collect();
        assert_eq!(order, vec![0b010, 0b100, 0b001]);
    }

    #[test]
    fn sorter_breaks_ties_by_reverse_insertion() {
        let mut sorter = MoveSorter::new();
        sorter.push(0b001, 1);
        sorter.push(0b010, 1);
        sorter.push(0b100, 1);

        // callers push in reversed static order, so the last push (the
        // most central column) must come out first
        let order: Vec<u64> = sorter.collect();
        assert_eq!(order, vec![0b100, 0b010, 0b001]);
    }
}
