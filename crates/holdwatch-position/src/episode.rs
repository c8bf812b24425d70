//! Position-episode reconstruction.
//!
//! An episode is the stretch of fills during which the position for one
//! direction stays non-zero. Its start is the last time the position moved
//! from flat (or the opposite direction) into the requested direction.
//!
//! Two accounting modes:
//!
//! - [`AccountingMode::NetBalance`]: one signed balance per symbol, every
//!   fill participates. A long episode opens when the balance goes from
//!   zero-or-short to long, so a flip opens a new episode.
//! - [`AccountingMode::SideTagged`]: hedge mode. Only fills tagged with the
//!   requested direction's ledger participate; opening fills grow the
//!   ledger, reducing fills shrink it (never below zero). The episode opens
//!   on the last flat-to-open move of that ledger.
//!
//! When no transition is seen but usable fills exist, the earliest relevant
//! fill is used so a non-empty history never yields nothing.

use holdwatch_core::{AccountingMode, Direction, OrderRecord, Quantity};
use holdwatch_telemetry::Metrics;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PositionError, PositionResult};
use crate::fills::count_in_history;
use crate::history::{Fill, FillHistory, SkipReason};

/// Balances whose magnitude is at most this count as flat.
pub const BALANCE_EPSILON: Decimal = dec!(0.0000001);

/// Start (Unix ms) of the currently open episode for `direction`.
///
/// Returns [`PositionError::NotFound`] when no usable fill exists; callers
/// normally substitute the current time.
pub fn reconstruct_open_time(
    orders: &[OrderRecord],
    direction: Direction,
    mode: AccountingMode,
) -> PositionResult<u64> {
    FillHistory::from_orders(orders).open_time(direction, mode)
}

impl FillHistory {
    /// Start of the currently open episode, see [`reconstruct_open_time`].
    pub fn open_time(&self, direction: Direction, mode: AccountingMode) -> PositionResult<u64> {
        let found = match mode {
            AccountingMode::NetBalance => self.net_balance_open_time(direction),
            AccountingMode::SideTagged => self.side_tagged_open_time(direction),
        };
        found.ok_or(PositionError::NotFound { direction })
    }

    fn net_balance_open_time(&self, direction: Direction) -> Option<u64> {
        let mut balance = Quantity::ZERO;
        let mut opened_at = None;

        for fill in self.fills() {
            let Some(next) = balance.checked_add(fill.signed_quantity()) else {
                skip_overflowing(fill);
                continue;
            };
            let before = classify(balance);
            balance = next;
            let after = classify(balance);

            if after == Some(direction) && before != Some(direction) {
                opened_at = Some(fill.time_ms);
            }
        }

        opened_at.or_else(|| self.fills().first().map(|fill| fill.time_ms))
    }

    fn side_tagged_open_time(&self, direction: Direction) -> Option<u64> {
        let mut balance = Quantity::ZERO;
        let mut opened_at = None;
        let mut earliest = None;

        for fill in self.ledger(direction.ledger()) {
            earliest.get_or_insert(fill.time_ms);

            if direction.is_opened_by(fill.side) {
                let Some(next) = balance.checked_add(fill.quantity) else {
                    skip_overflowing(fill);
                    continue;
                };
                if balance.is_flat(BALANCE_EPSILON) {
                    opened_at = Some(fill.time_ms);
                }
                balance = next;
            } else {
                // balance >= 0 and quantity > 0, so this cannot leave the range
                balance = balance
                    .checked_sub(fill.quantity)
                    .map_or(Quantity::ZERO, |b| b.max(Quantity::ZERO));
            }
        }

        opened_at.or(earliest)
    }
}

/// A fill whose quantity would push the balance out of the decimal range
/// is treated like any other malformed fill.
fn skip_overflowing(fill: &Fill) {
    warn!(
        order_id = %fill.id,
        quantity = %fill.quantity,
        time_ms = fill.time_ms,
        reason = %SkipReason::Quantity,
        "Skipping fill that overflows the position balance"
    );
    Metrics::malformed_order(SkipReason::Quantity.as_str());
}

/// Direction of a one-way balance, `None` when flat.
fn classify(balance: Quantity) -> Option<Direction> {
    if balance.is_flat(BALANCE_EPSILON) {
        None
    } else if balance.inner().is_sign_positive() {
        Some(Direction::Long)
    } else {
        Some(Direction::Short)
    }
}

/// Start time and fill count of one open position, computed from a single
/// normalization pass over its order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// `None` when the history holds no usable fill.
    pub opened_at_ms: Option<u64>,
    pub fill_count: usize,
}

impl EpisodeReport {
    pub fn from_orders(
        orders: &[OrderRecord],
        direction: Direction,
        mode: AccountingMode,
    ) -> Self {
        let history = FillHistory::from_orders(orders);
        match history.open_time(direction, mode) {
            Ok(start) => Self {
                opened_at_ms: Some(start),
                fill_count: count_in_history(&history, start, direction, mode),
            },
            Err(PositionError::NotFound { .. }) => Self {
                opened_at_ms: None,
                fill_count: 0,
            },
        }
    }

    /// Episode start, or `now_ms` (zero age) when unknown.
    pub fn opened_at_or(&self, now_ms: u64) -> u64 {
        self.opened_at_ms.unwrap_or(now_ms)
    }
}
