use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement over every cell but the safe one, reproducible from `seed`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, board: &mut Board, mines: CellCount, safe: Coord2) -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        board.place_mines(mines, safe, &mut rng)
    }
}
