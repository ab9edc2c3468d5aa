use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Lays mines on a blank board, keeping `safe` clear.
pub trait MineGenerator {
    fn generate(self, board: &mut Board, mines: CellCount, safe: Coord2) -> Result<()>;
}
