use crate::position::Position;

/// The strong and weak solutions of a root position
///
/// Built once from the scores of every legal move; the per-move scores are
/// from the opponent's perspective (each child position is scored for the
/// player who moves next), so the best move has the *smallest* score.
#[derive(Clone, Debug)]
pub struct SolvedPosition {
    position: Position,
    strong_score: i32,
    strong_moves: Vec<usize>,
    weak_score: i32,
    weak_moves: Vec<usize>,
}

impl SolvedPosition {
    /// Aggregates (column, opponent score) pairs into the public result
    ///
    /// The pairs must be in ascending column order; the move sets keep
    /// that order.
    pub fn from_move_scores(position: Position, move_scores: &[(usize, i32)]) -> Self {
        if move_scores.is_empty() {
            // a full board with no legal moves is a finished draw
            return Self {
                position,
                strong_score: 0,
                strong_moves: Vec::new(),
                weak_score: 0,
                weak_moves: Vec::new(),
            };
        }

        let best = move_scores
            .iter()
            .map(|&(_, score)| score)
            .min()
            .unwrap_or(0);

        // the exact result: all moves the opponent scores worst from
        let strong_moves = move_scores
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(column, _)| column)
            .collect();
        let strong_score = -best;

        // the outcome-only result collapses scores to their sign
        let category = best.signum();
        let weak_moves = if category > 0 {
            // every move loses; there is no good move to recommend
            Vec::new()
        } else {
            move_scores
                .iter()
                .filter(|&&(_, score)| score.signum() == category)
                .map(|&(column, _)| column)
                .collect()
        };
        let weak_score = -category;

        Self {
            position,
            strong_score,
            strong_moves,
            weak_score,
            weak_moves,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The exact score of the position under optimal play
    pub fn strong_score(&self) -> i32 {
        self.strong_score
    }

    /// All columns achieving the strong score, in ascending order
    pub fn strong_moves(&self) -> &[usize] {
        &self.strong_moves
    }

    /// The outcome of the position: 1 win, 0 draw, -1 loss
    pub fn weak_score(&self) -> i32 {
        self.weak_score
    }

    /// All columns achieving the weak outcome, in ascending order; empty
    /// when every move loses
    pub fn weak_moves(&self) -> &[usize] {
        &self.weak_moves
    }
}
