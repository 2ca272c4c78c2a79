//! Error types for the lights-out core.

use thiserror::Error;

/// Errors raised while modelling, solving or replaying a board.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LightsOutError {
    /// A board did not have exactly 9 cells, or a custom list did not split
    /// into whole boards.
    #[error("Invalid grid size: expected a multiple of 9 cells, got {len}")]
    InvalidGridSize { len: usize },

    /// A cell value other than 0 or 1.
    #[error("Invalid cell value '{value}': cells must be 0 or 1")]
    InvalidCell { value: String },

    /// A cell index outside `0..9`.
    #[error("Cell index {index} out of range 0..9")]
    IndexOutOfRange { index: usize },

    /// A measured or user-supplied bitstring that is not 9 binary digits.
    #[error("Invalid bitstring '{0}': expected 9 characters of 0/1")]
    InvalidBitstring(String),

    /// The backend refused work.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend returned no samples.
    #[error("Backend returned an empty sample set")]
    EmptySampleSet,

    /// The most frequent outcome did not stand out from the runner-up.
    #[error("No dominant outcome: top count {top}, runner-up {runner_up}")]
    NoDominantOutcome { top: u64, runner_up: u64 },

    /// Circuit construction error.
    #[error(transparent)]
    Ir(#[from] lightsout_ir::IrError),

    /// Backend execution error.
    #[error(transparent)]
    Hal(lightsout_hal::HalError),

    /// Reading a custom grid file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lightsout_hal::HalError> for LightsOutError {
    fn from(err: lightsout_hal::HalError) -> Self {
        match err {
            lightsout_hal::HalError::BackendUnavailable(msg) => Self::BackendUnavailable(msg),
            other => Self::Hal(other),
        }
    }
}

/// Result type for lights-out operations.
pub type LightsOutResult<T> = Result<T, LightsOutError>;
