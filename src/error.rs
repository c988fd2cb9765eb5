use crate::{
    data::Cell,
    model::{Grid, Pos},
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Game already started. Try setting a new board.")]
    GameAlreadyStarted,
    #[error("Difficulty was not specified. Call set_difficulty() before play().")]
    UnspecifiedDifficulty,
    #[error("Grid was not specified. Call set_grid() before play().")]
    UnspecifiedGrid,
    /// A bomb was visited. `revealed` holds the detonated cell followed by
    /// every other bomb on the board.
    #[error("Game over at X={} Y={}", .pos.x, .pos.y)]
    Exploded { pos: Pos, revealed: Vec<Cell> },
    #[error("position {pos} is outside the {}x{} grid", .grid.width, .grid.height)]
    OutOfBounds { pos: Pos, grid: Grid },
    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}

impl Error {
    /// Cells revealed by the failed call, if any.
    pub fn revealed(&self) -> &[Cell] {
        match self {
            Self::Exploded { revealed, .. } => revealed,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
