use serde::{Deserialize, Serialize};

/// What the player currently sees on top of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cover {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// One grid position. A cell can't be flagged and revealed at the same time since both live in `cover`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) has_mine: bool,
    pub(crate) adjacent_mines: u8,
    pub(crate) cover: Cover,
}

impl Cell {
    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    /// Number of mines among the surrounding cells, always 0 for mined cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn cover(self) -> Cover {
        self.cover
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.cover, Cover::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.cover, Cover::Flagged)
    }

    pub const fn is_hidden_safe(self) -> bool {
        !self.has_mine && !self.is_revealed()
    }
}
