//! The exchange gateway seam.

use async_trait::async_trait;
use holdwatch_core::{AccountingMode, OrderRecord, PositionSnapshot};
use holdwatch_telemetry::Metrics;

use crate::client::FuturesClient;
use crate::error::ExchangeResult;

/// What the bot needs from an exchange account.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Recent orders of `symbol` in any order and status.
    async fn list_orders(&self, symbol: &str, limit: u32) -> ExchangeResult<Vec<OrderRecord>>;

    /// Position rows of the account. May include closed (zero) rows.
    async fn open_positions(&self) -> ExchangeResult<Vec<PositionSnapshot>>;

    /// How the account nets orders into positions.
    async fn position_mode(&self) -> ExchangeResult<AccountingMode>;
}

fn observe<T>(result: ExchangeResult<T>) -> ExchangeResult<T> {
    if let Err(err) = &result {
        Metrics::gateway_error(err.kind().as_str());
    }
    result
}

#[async_trait]
impl ExchangeGateway for FuturesClient {
    async fn list_orders(&self, symbol: &str, limit: u32) -> ExchangeResult<Vec<OrderRecord>> {
        observe(self.all_orders(symbol, limit).await)
    }

    async fn open_positions(&self) -> ExchangeResult<Vec<PositionSnapshot>> {
        observe(self.position_risk().await)
    }

    async fn position_mode(&self) -> ExchangeResult<AccountingMode> {
        observe(self.dual_side_position().await)
    }
}
