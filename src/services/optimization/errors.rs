use crate::models::{AlphaOutOfRange, ConfigError, GridError, MutagenError, SelectionError};

/// Errors that can occur during optimization operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ConfigError: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("CrossoverError: {0}")]
    CrossoverError(#[from] AlphaOutOfRange),
    #[error("MutagenError: {0}")]
    MutagenError(#[from] MutagenError),
    #[error("Selection error: {0}")]
    SelectionError(#[from] SelectionError),
    #[error("GridError: {0}")]
    GridError(#[from] GridError),
    #[error("Interrupted: search abandoned after {completed_generations} generations")]
    Interrupted { completed_generations: usize },
    #[error("TaskFailed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
