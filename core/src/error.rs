use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No mine at {0:?}")]
    NoMineAt(Coord2),
    #[error("Cell {0:?} already holds a mine")]
    CellOccupied(Coord2),
    #[error("Cell {0:?} is already revealed")]
    CellRevealed(Coord2),
}

pub type Result<T> = core::result::Result<T, GameError>;
