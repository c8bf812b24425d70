#![allow(dead_code)]

pub mod fake_gateway;
pub mod recording_notifier;

use holdwatch_core::{OrderId, OrderRecord, OrderSide, OrderStatus, PositionSide, PositionSnapshot};

pub const HOUR: u64 = 3_600_000;

pub fn position(symbol: &str, amt: &str, entry: &str, pnl: &str) -> PositionSnapshot {
    PositionSnapshot {
        symbol: symbol.into(),
        position_amt: amt.into(),
        entry_price: entry.into(),
        unrealized_pnl: pnl.into(),
        position_side: PositionSide::Both,
    }
}

pub fn filled(id: u64, symbol: &str, side: OrderSide, qty: &str, time_ms: u64) -> OrderRecord {
    OrderRecord {
        id: OrderId(id),
        symbol: symbol.into(),
        side,
        status: OrderStatus::Filled,
        executed_qty: qty.into(),
        time_ms,
        update_time_ms: time_ms,
        position_side: PositionSide::Both,
    }
}
