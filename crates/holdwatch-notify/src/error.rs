//! Notification error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// A multi-part message stopped at `part` (1-based).
    #[error("Failed to send part {part} of {total}: {reason}")]
    Part {
        part: usize,
        total: usize,
        reason: String,
    },

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
