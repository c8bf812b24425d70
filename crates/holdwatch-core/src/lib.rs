//! Core domain types for holdwatch.
//!
//! This crate provides the vocabulary shared by every other crate:
//! - `OrderRecord`: one historical order as reported by the venue
//! - `PositionSnapshot`: current state of an open position
//! - `Quantity`, `Price`: precision-safe numeric types
//! - `Direction`, `AccountingMode`: how positions are netted
//! - `HoldDuration`: holding-time limits such as `12h` or `1.5d`

pub mod decimal;
pub mod duration;
pub mod error;
pub mod limit;
pub mod order;
pub mod position;
pub mod symbol;

pub use decimal::{parse_decimal, Price, Quantity};
pub use duration::HoldDuration;
pub use error::{CoreError, Result};
pub use limit::LimitRule;
pub use order::{OrderId, OrderRecord, OrderSide, OrderStatus, PositionSide};
pub use position::{AccountingMode, Direction, PositionSnapshot, OPEN_SIZE_EPSILON};
pub use symbol::{base_asset, QUOTE_SUFFIXES};
