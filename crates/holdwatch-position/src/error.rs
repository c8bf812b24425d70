//! Position error types.

use holdwatch_core::Direction;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// No usable fill exists for the requested direction.
    #[error("No usable fill history for {direction} position")]
    NotFound { direction: Direction },
}

pub type PositionResult<T> = Result<T, PositionError>;
