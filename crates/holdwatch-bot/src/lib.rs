//! Holdwatch: a Telegram watchdog for Binance futures holding times.
//!
//! - Chat commands for positions and per-coin holding limits
//! - Periodic limit checks with a combined alert
//! - Accounting mode resolved once at startup

pub mod app;
pub mod checker;
pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod service;

pub use app::{Application, CommandHandler};
pub use checker::{CheckOutcome, LimitChecker};
pub use command::Command;
pub use config::{AppConfig, Secrets};
pub use error::{AppError, AppResult};
pub use service::{PositionView, PositionsService};

/// Wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
