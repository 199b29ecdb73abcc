use bingo_types::{ConfigurationError, GridError, GridSize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Not enough species to fill a {size} card: need {required}, pool has {available}")]
    InsufficientPool {
        size: GridSize,
        required: usize,
        available: usize,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Composed an invalid grid: {0}")]
    Grid(#[from] GridError),
}
