//! Wire types for the futures REST endpoints.
//!
//! Binance reports numbers as strings; they are kept verbatim and parsed by
//! the domain types.

use holdwatch_core::{
    OrderId, OrderRecord, OrderSide, OrderStatus, PositionSide, PositionSnapshot,
};
use serde::Deserialize;

/// Entry of `GET /fapi/v1/allOrders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    pub order_id: u64,
    pub symbol: String,
    pub side: OrderSide,
    pub status: OrderStatus,
    #[serde(default)]
    pub executed_qty: String,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub update_time: u64,
    #[serde(default)]
    pub position_side: PositionSide,
}

impl From<RawOrder> for OrderRecord {
    fn from(raw: RawOrder) -> Self {
        OrderRecord {
            id: OrderId::new(raw.order_id),
            symbol: raw.symbol,
            side: raw.side,
            status: raw.status,
            executed_qty: raw.executed_qty,
            time_ms: raw.time,
            update_time_ms: raw.update_time,
            position_side: raw.position_side,
        }
    }
}

/// Entry of `GET /fapi/v2/positionRisk`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPositionRisk {
    pub symbol: String,
    pub position_amt: String,
    pub entry_price: String,
    #[serde(default, rename = "unRealizedProfit")]
    pub unrealized_profit: String,
    #[serde(default)]
    pub position_side: PositionSide,
}

impl From<RawPositionRisk> for PositionSnapshot {
    fn from(raw: RawPositionRisk) -> Self {
        PositionSnapshot {
            symbol: raw.symbol,
            position_amt: raw.position_amt,
            entry_price: raw.entry_price,
            unrealized_pnl: raw.unrealized_profit,
            position_side: raw.position_side,
        }
    }
}

/// Body of `GET /fapi/v1/positionSide/dual`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionModeResponse {
    /// `true` for hedge mode.
    pub dual_side_position: bool,
}
