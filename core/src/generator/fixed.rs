use alloc::vec::Vec;

use super::*;

/// Places mines at predetermined coordinates, e.g. to replay a known board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    /// The requested count is ignored in favour of the fixed layout; the safe cell still has to stay clear.
    fn generate(self, board: &mut Board, _mines: CellCount, safe: Coord2) -> Result<()> {
        board.validate_coords(safe)?;
        if self.mines.contains(&safe) {
            log::warn!("fixed layout puts a mine on the safe cell {:?}", safe);
            return Err(GameError::InvalidCoords);
        }
        board.set_mines(&self.mines)
    }
}
