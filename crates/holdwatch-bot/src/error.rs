//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Exchange error: {0}")]
    Exchange(#[from] holdwatch_exchange::ExchangeError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] holdwatch_persistence::PersistenceError),

    #[error("Notification error: {0}")]
    Notify(#[from] holdwatch_notify::NotifyError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] holdwatch_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
