use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Decides where mines go once the first cell of a game is revealed.
pub trait MineGenerator {
    /// Returns the coordinates of up to `config.mines` distinct mines.
    ///
    /// Implementations should keep `anchor` and its 8 neighbors free of mines.
    fn generate(&mut self, config: GameConfig, anchor: Coord2) -> Vec<Coord2>;
}

/// Number of cells on a board of `size` that are not within one step of `anchor`.
pub fn cells_outside_safe_zone(size: Coord2, anchor: Coord2) -> CellCount {
    let total = area(size);
    let (width, height) = size;
    if anchor.0 >= width || anchor.1 >= height {
        return total;
    }
    let safe_zone = 1 + neighbors_of(anchor, size).count() as CellCount;
    total - safe_zone
}
