#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use scores::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod scores;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Checks the board is non-empty and leaves room to place the mines around a safe first cell.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        check_mine_capacity(self.total_cells(), self.mines)
    }
}

/// Preset board sizes a game can be played on.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BoardSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl BoardSize {
    pub const ALL: [BoardSize; 3] = [Self::Small, Self::Medium, Self::Large];

    pub const fn config(self) -> GameConfig {
        use BoardSize::*;
        match self {
            Small => GameConfig::new(8, 8, 10),
            Medium => GameConfig::new(16, 16, 40),
            Large => GameConfig::new(16, 32, 100),
        }
    }

    /// Stable identifier, also used as the key in the high-score table.
    pub const fn key(self) -> &'static str {
        use BoardSize::*;
        match self {
            Small => "small",
            Medium => "medium",
            Large => "large",
        }
    }

    pub const fn label(self) -> &'static str {
        use BoardSize::*;
        match self {
            Small => "Small (8×8)",
            Medium => "Medium (16×16)",
            Large => "Large (32×16)",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.key() == key)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}
