use core::ops::Index;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular board of cells, indexed by `(x, y)`.
///
/// Every cell stores its own coordinates, which always equal its index in the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub fn new((width, height): Coord2) -> Self {
        let cells = Array2::from_shape_fn((usize::from(width), usize::from(height)), |(x, y)| {
            // both axes come from a `Coord`, so they fit back into one
            Cell::new((x as Coord, y as Coord))
        });
        Self { cells }
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.cells.dim();
        (width as Coord, height as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        area(self.size())
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        let (width, height) = self.size();
        x < width && y < height
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(nd(coords))
    }

    /// All cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// One view per `y`, each running over `x` from left to right.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.axis_iter(Axis(1))
    }

    /// Positions of the up to 8 cells touching `coords`. Borrows nothing from the grid.
    pub fn neighbor_coords(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors_of(coords, self.size())
    }

    /// The up to 8 cells touching `coords`, clipped to the board.
    pub fn neighbors(&self, coords: Coord2) -> impl Iterator<Item = &Cell> {
        self.neighbor_coords(coords).map(move |pos| &self[pos])
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_where(Cell::is_mine)
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_where(Cell::is_flagged)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_where(Cell::is_revealed)
    }

    /// Whether every cell is either revealed or flagged.
    pub fn is_fully_covered(&self) -> bool {
        self.cells.iter().all(Cell::is_covered_by_player)
    }

    /// Whether some flag sits on a cell that holds no mine.
    pub fn has_incorrect_flag(&self) -> bool {
        self.cells.iter().any(|cell| cell.flagged && !cell.mine)
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.count_neighbors_where(coords, |cell| cell.flagged)
    }

    /// Neighbors that are neither revealed nor flagged.
    pub fn count_hidden_neighbors(&self, coords: Coord2) -> u8 {
        self.count_neighbors_where(coords, |cell| !cell.is_covered_by_player())
    }

    /// Sets a mine on each listed cell, returning how many new mines were placed.
    pub(crate) fn place_mines(&mut self, mines: impl IntoIterator<Item = Coord2>) -> CellCount {
        let mut placed = 0;
        for coords in mines {
            let Some(cell) = self.cells.get_mut(nd(coords)) else {
                log::warn!("Ignoring mine outside of the board at {:?}", coords);
                continue;
            };
            if !cell.mine {
                cell.mine = true;
                placed += 1;
            }
        }
        placed
    }

    /// Recomputes `adjacent_mines` for every non-mine cell.
    pub fn update_numbers(&mut self) {
        let (width, height) = self.size();
        for x in 0..width {
            for y in 0..height {
                let coords = (x, y);
                if self[coords].mine {
                    continue;
                }
                let count = self.count_neighbors_where(coords, |cell| cell.mine);
                self.cells[nd(coords)].adjacent_mines = count;
            }
        }
    }

    /// Reveals the zero-adjacency region connected to `coords` along with its numbered border.
    ///
    /// Flagged cells are never opened and stop the expansion through them. Uses an explicit
    /// stack with the `revealed` flag as the visited marker, so region size is not bounded by
    /// call depth. Returns the number of cells this call revealed.
    pub fn expand_zero(&mut self, coords: Coord2) -> CellCount {
        let start = &self[coords];
        if start.mine || start.adjacent_mines != 0 {
            return 0;
        }

        let mut revealed = 0;
        let mut to_visit = vec![coords];
        while let Some(visit_coords) = to_visit.pop() {
            for pos in self.neighbor_coords(visit_coords) {
                let cell = &mut self.cells[nd(pos)];
                if cell.revealed || cell.flagged {
                    continue;
                }

                cell.revealed = true;
                revealed += 1;
                log::trace!(
                    "Flood opened cell at {:?}, mine count: {}",
                    pos,
                    cell.adjacent_mines
                );

                if cell.adjacent_mines == 0 {
                    to_visit.push(pos);
                }
            }
        }
        revealed
    }

    /// Marks every mine as revealed, leaving all other cells untouched.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.mine) {
            cell.revealed = true;
        }
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[nd(coords)]
    }

    fn count_where(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        // a grid never holds more than `Coord::MAX` squared cells
        self.cells.iter().filter(|cell| predicate(cell)).count() as CellCount
    }

    fn count_neighbors_where(&self, coords: Coord2, predicate: impl Fn(&Cell) -> bool) -> u8 {
        self.neighbors(coords).filter(|cell| predicate(cell)).count() as u8
    }
}

fn nd((x, y): Coord2) -> [usize; 2] {
    [usize::from(x), usize::from(y)]
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[nd(coords)]
    }
}
