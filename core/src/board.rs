use alloc::vec;
use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells changed by a single [`Board::flood_reveal`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FloodReport {
    /// Cells that went from unrevealed to revealed, disclosed mines included.
    pub revealed: CellCount,
    /// Flags removed because their cell got revealed.
    pub cleared_flags: CellCount,
    pub hit_mine: bool,
}

impl FloodReport {
    pub const fn has_update(self) -> bool {
        self.revealed > 0
    }

    fn absorb(&mut self, other: FloodReport) {
        self.revealed += other.revealed;
        self.cleared_flags += other.cleared_flags;
        self.hit_mine |= other.hit_mine;
    }
}

/// Rectangular minefield indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Blank board: nothing revealed, flagged or mined.
    pub fn new(rows: Coord, cols: Coord) -> Self {
        Self {
            cells: Array2::default((rows, cols).to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.contains(coords).then(|| self[coords])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Scatters `mines` mines uniformly over every cell but `safe`, then recounts adjacency.
    ///
    /// Uses rejection sampling, so the board must keep at least two mine-free cells.
    pub fn place_mines<R: Rng + ?Sized>(
        &mut self,
        mines: CellCount,
        safe: Coord2,
        rng: &mut R,
    ) -> Result<()> {
        check_mine_capacity(self.total_cells(), mines)?;
        let safe = self.validate_coords(safe)?;

        self.clear_mines();
        let (rows, cols) = self.size();
        let mut placed = 0;
        while placed < mines {
            let pos = (rng.random_range(0..rows), rng.random_range(0..cols));
            if pos == safe || self[pos].has_mine {
                continue;
            }
            self.cell_mut(pos).has_mine = true;
            placed += 1;
        }
        self.mine_count = placed;
        self.recount_adjacent_mines();

        log::debug!("placed {} mines around safe cell {:?}", placed, safe);
        Ok(())
    }

    /// Puts mines exactly at `coords`, replacing any previous layout.
    pub fn set_mines(&mut self, coords: &[Coord2]) -> Result<()> {
        for &pos in coords {
            self.validate_coords(pos)?;
        }

        self.clear_mines();
        for &pos in coords {
            self.cell_mut(pos).has_mine = true;
        }
        self.mine_count = self.cells.iter().filter(|cell| cell.has_mine).count() as CellCount;
        self.recount_adjacent_mines();
        Ok(())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].has_mine)
            .count() as u8
    }

    /// Reveals `start` and, through zero cells, everything connected to it.
    ///
    /// Hitting a mine discloses every mine on the board and stops the propagation.
    pub fn flood_reveal(&mut self, start: Coord2) -> FloodReport {
        let mut report = FloodReport::default();
        if self.get(start).is_none_or(Cell::is_revealed) {
            return report;
        }

        let mut pending = vec![start];
        while let Some(pos) = pending.pop() {
            let cell = self.cell_mut(pos);
            if cell.is_revealed() {
                continue;
            }
            if cell.is_flagged() {
                report.cleared_flags += 1;
            }
            cell.cover = Cover::Revealed;
            report.revealed += 1;

            let Cell {
                has_mine,
                adjacent_mines,
                ..
            } = *cell;

            if has_mine {
                report.hit_mine = true;
                report.absorb(self.reveal_all_mines());
                return report;
            }

            if adjacent_mines == 0 {
                pending.extend(
                    self.iter_neighbors(pos)
                        .filter(|&neighbor| !self[neighbor].is_revealed()),
                );
            }
        }
        report
    }

    /// Reveals every mined cell, leaving safe cells untouched.
    pub fn reveal_all_mines(&mut self) -> FloodReport {
        let mut report = FloodReport::default();
        for cell in self.cells.iter_mut().filter(|cell| cell.has_mine) {
            match cell.cover {
                Cover::Revealed => continue,
                Cover::Flagged => report.cleared_flags += 1,
                Cover::Hidden => {}
            }
            cell.cover = Cover::Revealed;
            report.revealed += 1;
        }
        report
    }

    /// Flips the flag on an unrevealed cell, returning the new flag state.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Option<bool> {
        if !self.contains(coords) {
            return None;
        }

        let cell = self.cell_mut(coords);
        cell.cover = match cell.cover {
            Cover::Hidden => Cover::Flagged,
            Cover::Flagged => Cover::Hidden,
            Cover::Revealed => return None,
        };
        Some(cell.is_flagged())
    }

    /// Safe cells still waiting to be revealed.
    pub fn hidden_safe_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_hidden_safe()).count() as CellCount
    }

    pub fn flagged_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_flagged()).count() as CellCount
    }

    /// Whether every safe cell is revealed. Flags are not considered.
    pub fn check_win(&self) -> bool {
        self.hidden_safe_count() == 0
    }

    fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    fn clear_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.has_mine = false;
            cell.adjacent_mines = 0;
        }
        self.mine_count = 0;
    }

    fn recount_adjacent_mines(&mut self) {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let pos = (row, col);
                let count = if self[pos].has_mine {
                    0
                } else {
                    self.adjacent_mine_count(pos)
                };
                self.cell_mut(pos).adjacent_mines = count;
            }
        }
    }
}

/// Rejects mine counts that would leave fewer than two mine-free cells.
pub(crate) fn check_mine_capacity(total: CellCount, mines: CellCount) -> Result<()> {
    if mines.saturating_add(1) >= total {
        Err(GameError::TooManyMines {
            max: total.saturating_sub(2),
        })
    } else {
        Ok(())
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let cell = self[(row, col)];
                let symbol = match cell.cover {
                    Cover::Hidden => '#',
                    Cover::Flagged => 'F',
                    Cover::Revealed if cell.has_mine => '*',
                    Cover::Revealed if cell.adjacent_mines == 0 => '.',
                    Cover::Revealed => char::from(b'0' + cell.adjacent_mines),
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
