//! Order normalization and chronological ordering.
//!
//! Raw venue orders become [`Fill`]s: only `FILLED` orders with a positive
//! executed quantity and a usable timestamp survive. Anything else that is
//! filled but malformed is skipped with a warning and counted, so a single
//! bad record never hides the rest of the history.

use holdwatch_core::{OrderId, OrderRecord, OrderSide, PositionSide, Quantity};
use holdwatch_telemetry::Metrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A filled order reduced to what the episode walk needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub id: OrderId,
    pub side: OrderSide,
    /// Executed quantity, always positive.
    pub quantity: Quantity,
    /// Effective time (Unix ms), never zero.
    pub time_ms: u64,
    pub position_side: PositionSide,
}

impl Fill {
    /// Signed contribution to a one-way balance.
    pub fn signed_quantity(&self) -> Quantity {
        match self.side {
            OrderSide::Buy => self.quantity,
            OrderSide::Sell => -self.quantity,
        }
    }
}

/// Why a filled order was left out of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Executed quantity missing, unparseable or not positive.
    Quantity,
    /// Both creation and update time are zero.
    Timestamp,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quantity => "quantity",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize one order.
///
/// `Ok(None)` for orders that never participate (anything not `FILLED`),
/// `Err` for filled orders that cannot be used.
pub fn normalize(order: &OrderRecord) -> Result<Option<Fill>, SkipReason> {
    if !order.is_filled() {
        return Ok(None);
    }

    let time_ms = order.effective_time_ms();
    if time_ms == 0 {
        return Err(SkipReason::Timestamp);
    }

    let quantity = order
        .executed_quantity()
        .map_err(|_| SkipReason::Quantity)?;
    if !quantity.is_positive() {
        return Err(SkipReason::Quantity);
    }

    Ok(Some(Fill {
        id: order.id,
        side: order.side,
        quantity,
        time_ms,
        position_side: order.position_side,
    }))
}

/// Sort fills by `(time_ms, id)` ascending.
///
/// The order id breaks timestamp ties, so the result does not depend on
/// the order the venue returned records in.
pub fn sort_chronologically(fills: &mut [Fill]) {
    fills.sort_unstable_by_key(|fill| (fill.time_ms, fill.id));
}

/// Normalized fills of one symbol, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillHistory {
    fills: Vec<Fill>,
}

impl FillHistory {
    /// Normalize and sort `orders`. The input is left untouched.
    pub fn from_orders(orders: &[OrderRecord]) -> Self {
        let mut fills: Vec<Fill> = orders
            .iter()
            .filter_map(|order| match normalize(order) {
                Ok(fill) => fill,
                Err(reason) => {
                    warn!(
                        order_id = %order.id,
                        symbol = %order.symbol,
                        executed_qty = %order.executed_qty,
                        time_ms = order.time_ms,
                        update_time_ms = order.update_time_ms,
                        reason = %reason,
                        "Skipping malformed filled order"
                    );
                    Metrics::malformed_order(reason.as_str());
                    None
                }
            })
            .collect();
        sort_chronologically(&mut fills);
        Self { fills }
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Fills of one hedge ledger, oldest first.
    pub fn ledger(&self, side: PositionSide) -> impl Iterator<Item = &Fill> + '_ {
        self.fills
            .iter()
            .filter(move |fill| fill.position_side == side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{filled, order};
    use holdwatch_core::OrderStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_filled_orders_are_dropped_silently() {
        for status in [
            OrderStatus::New,
            OrderStatus::Canceled,
            OrderStatus::Expired,
            OrderStatus::PartiallyFilled,
        ] {
            let o = order(1, OrderSide::Buy, status, "5", 1000);
            assert_eq!(normalize(&o), Ok(None));
        }
    }

    #[test]
    fn test_bad_quantity_is_reported() {
        for qty in ["", "abc", "0", "0.000", "-3"] {
            let o = filled(1, OrderSide::Buy, qty, 1000);
            assert_eq!(normalize(&o), Err(SkipReason::Quantity), "{qty:?}");
        }
    }

    #[test]
    fn test_quantity_tolerates_whitespace_and_plus() {
        let fill = normalize(&filled(1, OrderSide::Sell, " +2.5 ", 1000))
            .unwrap()
            .unwrap();
        assert_eq!(fill.quantity.inner(), dec!(2.5));
        assert_eq!(fill.signed_quantity().inner(), dec!(-2.5));
    }

    #[test]
    fn test_zero_timestamps_are_reported() {
        let mut o = filled(1, OrderSide::Buy, "1", 0);
        o.update_time_ms = 0;
        assert_eq!(normalize(&o), Err(SkipReason::Timestamp));
    }

    #[test]
    fn test_update_time_fallback() {
        let mut o = filled(1, OrderSide::Buy, "1", 0);
        o.update_time_ms = 4200;
        assert_eq!(normalize(&o).unwrap().unwrap().time_ms, 4200);
    }

    #[test]
    fn test_history_sorts_by_time_then_id() {
        let orders = vec![
            filled(9, OrderSide::Buy, "1", 3000),
            filled(7, OrderSide::Buy, "1", 1000),
            filled(5, OrderSide::Sell, "1", 3000),
            filled(8, OrderSide::Sell, "1", 2000),
        ];
        let history = FillHistory::from_orders(&orders);
        let ids: Vec<u64> = history.fills().iter().map(|f| f.id.value()).collect();
        assert_eq!(ids, vec![7, 8, 5, 9]);
        // Caller's collection is not reordered.
        assert_eq!(orders[0].id.value(), 9);
    }

    #[test]
    fn test_history_skips_malformed_and_keeps_the_rest() {
        let orders = vec![
            filled(1, OrderSide::Buy, "1", 1000),
            filled(2, OrderSide::Buy, "garbage", 2000),
            filled(3, OrderSide::Sell, "1", 3000),
        ];
        let history = FillHistory::from_orders(&orders);
        assert_eq!(history.len(), 2);
        assert!(!history.is_empty());
    }

    #[test]
    fn test_ledger_filter() {
        use crate::fixtures::hedged;
        let orders = vec![
            hedged(1, PositionSide::Long, OrderSide::Buy, "1", 1000),
            hedged(2, PositionSide::Short, OrderSide::Sell, "1", 2000),
            hedged(3, PositionSide::Long, OrderSide::Sell, "1", 3000),
        ];
        let history = FillHistory::from_orders(&orders);
        let long: Vec<u64> = history
            .ledger(PositionSide::Long)
            .map(|f| f.id.value())
            .collect();
        assert_eq!(long, vec![1, 3]);
    }
}
