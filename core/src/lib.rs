//! Rules engine for a single-player minesweeper board.
//!
//! [`BoardEngine`] owns the [`Grid`] and the game phase. Mines are placed lazily on the first
//! reveal, always leaving that cell and its neighbors clear. Every command re-checks the win and
//! loss conditions before returning, and reports what happened through a [`MoveOutcome`].

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod grid;
mod types;

/// Cells that are kept clear around the first move: the cell itself and its 8 neighbors.
pub const SAFE_ZONE_CELLS: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Checks that the board has cells and that the mines fit outside the first move's safe zone.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        let config = Self::new_unchecked(size, mines);
        if mines > config.max_mines() {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked((30, 16), 99)
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.size)
    }

    /// Largest mine count that still guarantees a clear first move anywhere on the board.
    pub const fn max_mines(&self) -> CellCount {
        self.total_cells().saturating_sub(SAFE_ZONE_CELLS)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// What a command did to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Changed,
    Won,
    Lost,
}

impl MoveOutcome {
    /// Whether a view of the board needs to be refreshed.
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Changed => true,
            Won => true,
            Lost => true,
        }
    }
}

/// Used to merge outcomes of commands that touch several cells
impl BitOr for MoveOutcome {
    type Output = MoveOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use MoveOutcome::*;
        match (self, rhs) {
            (Lost, _) => Lost,
            (_, Lost) => Lost,
            (Won, _) => Won,
            (_, Won) => Won,
            (Changed, _) => Changed,
            (_, Changed) => Changed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
