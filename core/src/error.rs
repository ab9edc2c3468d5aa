use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines, at most {max} fit on this board")]
    TooManyMines { max: CellCount },
    #[error("Board must have at least one row and one column")]
    EmptyBoard,
    #[error("Score storage is unavailable")]
    StorageUnavailable,
}

pub type Result<T> = core::result::Result<T, GameError>;
