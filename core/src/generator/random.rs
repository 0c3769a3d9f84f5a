use std::collections::BTreeSet;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Uniformly random placement that keeps the first revealed cell and its neighbors clear.
///
/// Uses rejection sampling: a random cell is drawn until it lands outside the safe zone and on a
/// cell without a mine. The request is first capped to the number of cells that can actually take
/// a mine, so the loop always finishes, but the expected number of draws grows sharply as the
/// mine count approaches that cap. This is accepted for playable densities.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    seed: u64,
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed this generator started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for RandomMineGenerator {
    fn default() -> Self {
        Self::new(rand::random())
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: GameConfig, anchor: Coord2) -> Vec<Coord2> {
        let (width, height) = config.size;
        let free_cells = cells_outside_safe_zone(config.size, anchor);

        let target = if config.mines > free_cells {
            log::warn!(
                "Cannot fit {} mines outside the safe zone, placing {} instead",
                config.mines,
                free_cells
            );
            free_cells
        } else {
            config.mines
        };

        let mut mines = BTreeSet::new();
        let mut attempts: u64 = 0;
        while mines.len() < usize::from(target) {
            attempts += 1;
            let coords = (
                self.rng.random_range(0..width),
                self.rng.random_range(0..height),
            );
            if within_one(coords, anchor) {
                continue;
            }
            mines.insert(coords);
        }

        log::debug!(
            "Placed {} mines around {:?} in {} draws",
            mines.len(),
            anchor,
            attempts
        );
        mines.into_iter().collect()
    }
}
