//! Error taxonomy for grid construction and generation advance.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("invalid mutation table: {0}")]
    InvalidMutationTable(&'static str),

    #[error("failed to build compute pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A cell's observed (alive, alive-next) pair fell outside the defined
    /// transition matrix. Always a bug in the engine.
    #[error("internal consistency failure at cell [{row}, {col}]: {detail}")]
    InternalConsistency {
        row: usize,
        col: usize,
        detail: String,
    },
}

impl GridError {
    /// Configuration errors are raised at construction; everything else is a
    /// programming error.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GridError::InvalidDimensions { .. }
                | GridError::InvalidProbability { .. }
                | GridError::InvalidMutationTable(_)
        )
    }
}
