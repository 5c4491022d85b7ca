use anyhow::{anyhow, Result};

/// The largest board width expressible in a u64 bitboard with at least
/// 4 rows: `width * (height + 1) < 64` with `height >= 4`
pub const MAX_WIDTH: usize = 12;

/// Board geometry and the score bounds derived from it
///
/// Constructed once and handed to [`Position`] factories and
/// [`Solver::new`], so the board dimensions are an explicit value rather
/// than ambient state.
///
/// [`Position`]: crate::position::Position
/// [`Solver::new`]: crate::solver::Solver::new
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    height: usize,
    width: usize,
    // mask of the bottom row, one bit per column
    bottom_row: u64,
    // mask of every playable cell, guard bits excluded
    full_board: u64,
}

impl BoardConfig {
    /// Creates a board configuration, rejecting dimensions that cannot
    /// host a 4-in-a-row game or do not fit a u64 bitboard
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height < 4 || width < 4 {
            return Err(anyhow!(
                "board of {}x{} is too small for 4-in-a-row",
                height,
                width
            ));
        }
        if width * (height + 1) >= 64 {
            return Err(anyhow!(
                "board of {}x{} does not fit a 64-bit bitboard",
                height,
                width
            ));
        }

        let mut bottom_row = 0;
        for column in 0..width {
            bottom_row |= 1 << (column * (height + 1));
        }
        let full_board = bottom_row * ((1 << height) - 1);

        Ok(Self {
            height,
            width,
            bottom_row,
            full_board,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of cells on the board
    pub fn board_size(&self) -> usize {
        self.height * self.width
    }

    /// The lowest score any reachable position can have: the current
    /// player loses with the opponent's 4th-to-last possible disk
    pub fn min_score(&self) -> i32 {
        -(self.board_size() as i32) / 2 + 3
    }

    /// The highest score any reachable position can have
    pub fn max_score(&self) -> i32 {
        (self.board_size() as i32 + 1) / 2 - 3
    }

    pub fn bottom_row_mask(&self) -> u64 {
        self.bottom_row
    }

    pub fn full_board_mask(&self) -> u64 {
        self.full_board
    }

    /// Mask of all playable cells of a column
    pub fn column_mask(&self, column: usize) -> u64 {
        ((1 << self.height) - 1) << (column * (self.height + 1))
    }

    /// Mask of the highest playable cell of a column
    pub fn top_mask(&self, column: usize) -> u64 {
        1 << (column * (self.height + 1) + (self.height - 1))
    }

    /// Mask of the bottom cell of a column
    pub fn bottom_mask(&self, column: usize) -> u64 {
        1 << (column * (self.height + 1))
    }

    /// Columns ordered from the middle outwards, as central columns are
    /// often the better moves
    pub fn column_order(&self) -> [usize; MAX_WIDTH] {
        let mut order = [0; MAX_WIDTH];
        for (i, slot) in order.iter_mut().take(self.width).enumerate() {
            let offset = ((i + 1) / 2) as i32;
            let sign = if i % 2 == 0 { 1 } else { -1 };
            *slot = ((self.width / 2) as i32 + sign * offset) as usize;
        }
        order
    }
}

impl Default for BoardConfig {
    /// The standard 6x7 board
    fn default() -> Self {
        // the default dimensions are validated at compile time in lib.rs
        Self::new(crate::DEFAULT_HEIGHT, crate::DEFAULT_WIDTH).unwrap()
    }
}
