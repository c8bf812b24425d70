//! Position open-time reconstruction for holdwatch.
//!
//! Pure, synchronous and reentrant: every function takes its input by
//! reference and allocates its own scratch state.
//!
//! # Key Components
//!
//! - [`Fill`]: a filled order reduced to the fields the walk needs
//! - [`FillHistory`]: normalized fills in chronological order
//! - [`reconstruct_open_time`]: start of the currently open episode
//! - [`count_fills`]: fills belonging to that episode
//! - [`EpisodeReport`]: both of the above from one normalization pass
//! - [`evaluate`] / [`LimitStatus`]: episode age against a holding limit

pub mod episode;
pub mod error;
pub mod fills;
pub mod history;
pub mod limit;

pub use episode::{reconstruct_open_time, EpisodeReport, BALANCE_EPSILON};
pub use error::{PositionError, PositionResult};
pub use fills::count_fills;
pub use history::{normalize, Fill, FillHistory, SkipReason};
pub use limit::{episode_age_ms, evaluate, LimitStatus};

#[cfg(test)]
pub(crate) mod fixtures {
    use holdwatch_core::{OrderId, OrderRecord, OrderSide, OrderStatus, PositionSide};

    pub fn order(
        id: u64,
        side: OrderSide,
        status: OrderStatus,
        qty: &str,
        time_ms: u64,
    ) -> OrderRecord {
        OrderRecord {
            id: OrderId::new(id),
            symbol: "LSKUSDT".to_string(),
            side,
            status,
            executed_qty: qty.to_string(),
            time_ms,
            update_time_ms: time_ms,
            position_side: PositionSide::Both,
        }
    }

    pub fn filled(id: u64, side: OrderSide, qty: &str, time_ms: u64) -> OrderRecord {
        order(id, side, OrderStatus::Filled, qty, time_ms)
    }

    pub fn hedged(
        id: u64,
        ledger: PositionSide,
        side: OrderSide,
        qty: &str,
        time_ms: u64,
    ) -> OrderRecord {
        OrderRecord {
            position_side: ledger,
            ..filled(id, side, qty, time_ms)
        }
    }

    /// Open/close/reopen history on a one-way account; the live long
    /// episode starts at t=6000 with two fills.
    pub fn lsk_history() -> Vec<OrderRecord> {
        use OrderSide::{Buy, Sell};
        vec![
            filled(11, Buy, "127", 1000),
            filled(12, Sell, "127", 2000),
            filled(13, Buy, "125", 3000),
            filled(14, Sell, "125", 4000),
            order(15, Buy, OrderStatus::Canceled, "0", 5000),
            filled(16, Buy, "261", 6000),
            filled(17, Buy, "100", 7000),
        ]
    }

    /// Hedge-mode history: long opened at t=1000 (two fills), short at
    /// t=2000 (one fill).
    pub fn hedge_history() -> Vec<OrderRecord> {
        vec![
            hedged(1, PositionSide::Long, OrderSide::Buy, "0.1", 1000),
            hedged(2, PositionSide::Short, OrderSide::Sell, "0.2", 2000),
            hedged(3, PositionSide::Long, OrderSide::Buy, "0.1", 3000),
        ]
    }

    /// Ledger-tagged orders that never filled.
    pub fn hedge_noise() -> Vec<OrderRecord> {
        let tagged = |id, ledger, side, status, time_ms| OrderRecord {
            position_side: ledger,
            ..order(id, side, status, "0", time_ms)
        };
        vec![
            tagged(40, PositionSide::Long, OrderSide::Buy, OrderStatus::Canceled, 500),
            tagged(41, PositionSide::Short, OrderSide::Sell, OrderStatus::Expired, 1500),
            tagged(42, PositionSide::Long, OrderSide::Sell, OrderStatus::New, 2500),
            tagged(43, PositionSide::Short, OrderSide::Buy, OrderStatus::Canceled, 3500),
        ]
    }

    /// Deterministic permutation (reverse, then rotate by `shift`).
    pub fn permuted(orders: &[OrderRecord], shift: usize) -> Vec<OrderRecord> {
        let mut out: Vec<OrderRecord> = orders.iter().rev().cloned().collect();
        if !out.is_empty() {
            let len = out.len();
            out.rotate_left(shift % len);
        }
        out
    }
}
