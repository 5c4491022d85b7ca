use std::fmt;

use anyhow::{anyhow, Result};

use crate::config::BoardConfig;

/// A Connect-Four position as two bitboards
///
/// Each column occupies `height + 1` consecutive bits, lowest bit at the
/// bottom cell and an always-empty guard bit above the top cell. On the
/// default board the cells are numbered:
///
/// ```text
/// 5 12 19 26 33 40 47
/// 4 11 18 25 32 39 46
/// 3 10 17 24 31 38 45
/// 2  9 16 23 30 37 44
/// 1  8 15 22 29 36 43
/// 0  7 14 21 28 35 42
/// ```
///
/// `current` holds the disks of the player to move, `occupied` every disk
/// on the board. `current` is always a subset of `occupied` and the number
/// of moves played equals `occupied.count_ones()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    config: BoardConfig,
    // disks of the player to move
    current: u64,
    // all disks on the board
    occupied: u64,
}

impl Position {
    /// An empty board
    pub fn empty(config: BoardConfig) -> Self {
        Self {
            config,
            current: 0,
            occupied: 0,
        }
    }

    /// Builds a position from raw masks, validating that they describe a
    /// board state reachable by alternating play
    pub fn from_masks(config: BoardConfig, current: u64, occupied: u64) -> Result<Self> {
        if occupied & !config.full_board_mask() != 0 {
            return Err(anyhow!("occupied mask has bits outside the board"));
        }
        if current & !occupied != 0 {
            return Err(anyhow!("current mask is not a subset of the occupied mask"));
        }
        // under alternating play the player to move owns half the disks
        if current.count_ones() != occupied.count_ones() / 2 {
            return Err(anyhow!(
                "the player to move cannot own {} of {} disks",
                current.count_ones(),
                occupied.count_ones()
            ));
        }
        // every column must be filled from the bottom up
        for column in 0..config.width() {
            let column_bits = occupied & config.column_mask(column);
            if (column_bits + config.bottom_mask(column)) & column_bits != 0 {
                return Err(anyhow!("column {} has a floating disk", column));
            }
        }
        Ok(Self {
            config,
            current,
            occupied,
        })
    }

    /// Replays a sequence of 1-indexed column digits, e.g. `"4444"` fills
    /// the centre column of a 7-wide board
    ///
    /// Fails if any move is out of range, illegal, or would win the game.
    pub fn from_move_sequence<S: AsRef<str>>(config: BoardConfig, moves: S) -> Result<Self> {
        let mut position = Self::empty(config);
        for move_char in moves.as_ref().chars() {
            match move_char.to_digit(10).map(|c| c as usize) {
                Some(column) if (1..=config.width()).contains(&column) => {
                    position.replay_move(column - 1)?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", move_char)),
            }
        }
        Ok(position)
    }

    /// Replays a sequence of 0-indexed column digits
    ///
    /// Fails if any move is out of range, illegal, or would win the game.
    pub fn from_column_sequence<S: AsRef<str>>(config: BoardConfig, columns: S) -> Result<Self> {
        let mut position = Self::empty(config);
        for column_char in columns.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column) if column < config.width() => {
                    position.replay_move(column)?;
                }
                _ => {
                    return Err(anyhow!(
                        "could not parse '{}' as a valid column",
                        column_char
                    ))
                }
            }
        }
        Ok(position)
    }

    fn replay_move(&mut self, column: usize) -> Result<()> {
        if !self.legal_move(column) {
            return Err(anyhow!("invalid move, column {} is full", column));
        }
        if self.is_winning_move(column) {
            return Err(anyhow!("invalid position, the game is already over"));
        }
        self.play_column(column);
        Ok(())
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn current_mask(&self) -> u64 {
        self.current
    }

    pub fn occupied_mask(&self) -> u64 {
        self.occupied
    }

    /// The number of disks on the board
    pub fn move_count(&self) -> usize {
        self.occupied.count_ones() as usize
    }

    /// True if the column has room for another disk
    pub fn legal_move(&self, column: usize) -> bool {
        self.occupied & self.config.top_mask(column) == 0
    }

    /// Drops the current player's disk into a column
    ///
    /// Adding the column's bottom bit to the occupied mask carries through
    /// the filled cells and lands exactly one cell above the top disk.
    pub fn play_column(&mut self, column: usize) {
        self.current ^= self.occupied;
        self.occupied |= self.occupied + self.config.bottom_mask(column);
    }

    /// Plays a move given as the single-bit mask of its landing cell
    pub fn play(&mut self, move_mask: u64) {
        self.current ^= self.occupied;
        self.occupied |= self.occupied + move_mask;
    }

    /// Mask of the landing cells of all legal moves
    pub fn legal_moves_mask(&self) -> u64 {
        (self.occupied + self.config.bottom_row_mask()) & self.config.full_board_mask()
    }

    /// True if the current player has an immediate winning move
    pub fn can_win_next(&self) -> bool {
        self.winning_cells(self.current) & self.legal_moves_mask() != 0
    }

    /// True if playing the column completes 4-in-a-row for the current player
    pub fn is_winning_move(&self, column: usize) -> bool {
        self.winning_cells(self.current) & self.legal_moves_mask() & self.config.column_mask(column)
            != 0
    }

    /// Mask of legal moves that do not hand the opponent an immediate win
    ///
    /// Only defends against the opponent's next-move threats: call this
    /// after checking `can_win_next()`, otherwise an immediate winning move
    /// of the current player may be filtered out.
    pub fn non_losing_moves(&self) -> u64 {
        let mut legal_moves = self.legal_moves_mask();
        let opponent_wins = self.winning_cells(self.current ^ self.occupied);
        let forced_moves = legal_moves & opponent_wins;
        if forced_moves != 0 {
            if forced_moves & (forced_moves - 1) != 0 {
                // two or more open threats cannot all be blocked
                return 0;
            }
            legal_moves = forced_moves;
        }
        // never play directly below an opponent's winning cell
        legal_moves & !(opponent_wins >> 1)
    }

    /// True if the position is decided one move ahead: either the current
    /// player wins next move or every move loses to the opponent's reply
    pub fn is_won(&self) -> bool {
        self.can_win_next() || self.non_losing_moves() == 0
    }

    /// Move-ordering heuristic: the number of winning cells the current
    /// player would own after playing the move
    pub fn move_score(&self, move_mask: u64) -> i32 {
        self.winning_cells(self.current | move_mask).count_ones() as i32
    }

    /// The position reflected about the board's vertical symmetry axis
    pub fn mirror(&self) -> Self {
        Self {
            config: self.config,
            current: self.mirror_mask(self.current),
            occupied: self.mirror_mask(self.occupied),
        }
    }

    fn mirror_mask(&self, mask: u64) -> u64 {
        let width = self.config.width();
        let column_bits = self.config.height() + 1;
        let mut mirrored = 0;
        for column in 0..width / 2 {
            let shift = (width - 1 - 2 * column) * column_bits;
            mirrored |= (mask & self.config.column_mask(column)) << shift;
            mirrored |= (mask & self.config.column_mask(width - 1 - column)) >> shift;
        }
        if width % 2 != 0 {
            mirrored |= mask & self.config.column_mask(width / 2);
        }
        mirrored
    }

    /// The canonical identity of the position
    ///
    /// Within each column `current`'s bits sit strictly below the carry
    /// structure of `occupied`, so the sum is injective over all reachable
    /// positions and needs no separate hashing.
    pub fn key(&self) -> u64 {
        self.current + self.occupied
    }

    /// Mask of the empty cells that would complete a 4-in-a-row for the
    /// disks in `mask`
    ///
    /// For each direction the completion cell is either an open end of a
    /// three-in-a-row or the internal gap of a broken three. Vertical
    /// completions can only sit on top of the run.
    fn winning_cells(&self, mask: u64) -> u64 {
        let height = self.config.height();

        // vertical
        let mut cells = (mask << 1) & (mask << 2) & (mask << 3);

        // horizontal and the two diagonals share the end/gap patterns
        for &step in &[height + 1, height, height + 2] {
            let pair = (mask << step) & (mask << (2 * step));
            cells |= pair & (mask << (3 * step));
            cells |= pair & (mask >> step);
            let pair = (mask >> step) & (mask >> (2 * step));
            cells |= pair & (mask >> (3 * step));
            cells |= pair & (mask << step);
        }

        cells & (self.config.full_board_mask() ^ self.occupied)
    }
}

impl fmt::Display for Position {
    /// Renders the board top row first, `1` for the first player's disks,
    /// `2` for the second player's, `.` for empty cells
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, second) = if self.move_count() % 2 == 0 {
            (self.current, self.current ^ self.occupied)
        } else {
            (self.current ^ self.occupied, self.current)
        };

        for row in (0..self.config.height()).rev() {
            for column in 0..self.config.width() {
                let cell = 1 << (column * (self.config.height() + 1) + row);
                let symbol = if first & cell != 0 {
                    '1'
                } else if second & cell != 0 {
                    '2'
                } else {
                    '.'
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
