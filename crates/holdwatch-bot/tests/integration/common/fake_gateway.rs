//! In-memory exchange gateway.

use async_trait::async_trait;
use holdwatch_core::{AccountingMode, OrderRecord, PositionSnapshot};
use holdwatch_exchange::{ExchangeError, ExchangeGateway, ExchangeResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeGateway {
    positions: Mutex<Vec<PositionSnapshot>>,
    orders: Mutex<HashMap<String, Vec<OrderRecord>>>,
    positions_error: Mutex<Option<(u16, String)>>,
    position_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(self, snapshot: PositionSnapshot) -> Self {
        self.positions.lock().push(snapshot);
        self
    }

    pub fn with_orders(self, symbol: &str, orders: Vec<OrderRecord>) -> Self {
        self.orders.lock().insert(symbol.to_string(), orders);
        self
    }

    /// Make `open_positions` fail with a venue error body.
    pub fn fail_positions(&self, status: u16, body: &str) {
        *self.positions_error.lock() = Some((status, body.to_string()));
    }

    pub fn position_calls(&self) -> usize {
        self.position_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeGateway for FakeGateway {
    async fn list_orders(&self, symbol: &str, _limit: u32) -> ExchangeResult<Vec<OrderRecord>> {
        Ok(self.orders.lock().get(symbol).cloned().unwrap_or_default())
    }

    async fn open_positions(&self) -> ExchangeResult<Vec<PositionSnapshot>> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((status, body)) = self.positions_error.lock().clone() {
            return Err(ExchangeError::from_response(status, &body));
        }
        Ok(self.positions.lock().clone())
    }

    async fn position_mode(&self) -> ExchangeResult<AccountingMode> {
        Ok(AccountingMode::NetBalance)
    }
}
