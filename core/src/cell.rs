use serde::{Deserialize, Serialize};

use crate::*;

/// A single board position with its mine, flag, reveal, and adjacency state.
///
/// Cells are owned by the [`Grid`]; callers only ever see shared references between commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) coords: Coord2,
    pub(crate) revealed: bool,
    pub(crate) mine: bool,
    pub(crate) flagged: bool,
    pub(crate) adjacent_mines: u8,
}

impl Cell {
    pub const fn new(coords: Coord2) -> Self {
        Self {
            coords,
            revealed: false,
            mine: false,
            flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Always `false` before mines are generated.
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Number of neighboring mines, meaningless for a mine cell.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// Revealed or flagged, the two states that count towards a finished board.
    pub const fn is_covered_by_player(&self) -> bool {
        self.revealed || self.flagged
    }

    pub const fn view(&self) -> CellView {
        match (self.revealed, self.mine, self.flagged) {
            (true, true, _) => CellView::Mine,
            (true, false, _) => CellView::Open(self.adjacent_mines),
            (false, _, true) => CellView::Flagged,
            (false, _, false) => CellView::Covered,
        }
    }
}

/// What a player is allowed to see of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Covered,
    Flagged,
    Open(u8),
    Mine,
}

impl CellView {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Covered
    }
}
