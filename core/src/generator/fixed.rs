use super::*;

/// Places mines exactly where it was told to, regardless of the first move.
///
/// Useful for puzzles and replays, where the layout is known upfront.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }

    pub fn mines(&self) -> &[Coord2] {
        &self.mines
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(&mut self, config: GameConfig, anchor: Coord2) -> Vec<Coord2> {
        if self.mines.iter().any(|&mine| within_one(mine, anchor)) {
            log::debug!(
                "Fixed layout puts a mine next to the first move at {:?} on {:?}",
                anchor,
                config.size
            );
        }
        self.mines.clone()
    }
}
