//! Persistence error types.

use holdwatch_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rejected user input; the stored document is unchanged.
    #[error("{0}")]
    Invalid(#[from] CoreError),

    #[error("Asset name must not be empty")]
    EmptyAsset,

    /// The limits file exists but cannot be parsed; edits are refused so
    /// the stored rules are not overwritten with defaults.
    #[error("Limits file {path} is corrupt ({reason}), fix or remove it first")]
    Corrupt { path: String, reason: String },
}

impl PersistenceError {
    /// Whether the error is about the user's input rather than the store.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::EmptyAsset)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
