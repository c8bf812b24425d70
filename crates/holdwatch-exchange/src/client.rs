//! Signed REST client for Binance USDⓈ-M futures.

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::dto::{PositionModeResponse, RawOrder, RawPositionRisk};
use crate::error::{ExchangeError, ExchangeResult};
use crate::signer::Credentials;
use holdwatch_core::{AccountingMode, OrderRecord, PositionSnapshot};

pub const DEFAULT_REST_URL: &str = "https://fapi.binance.com";

/// Largest page `allOrders` accepts.
pub const MAX_ORDER_HISTORY_LIMIT: u32 = 1000;

const ALL_ORDERS_PATH: &str = "/fapi/v1/allOrders";
const POSITION_RISK_PATH: &str = "/fapi/v2/positionRisk";
const POSITION_MODE_PATH: &str = "/fapi/v1/positionSide/dual";

/// Connection settings for [`FuturesClient`].
#[derive(Debug, Clone)]
pub struct FuturesClientConfig {
    pub rest_url: String,
    pub recv_window_ms: u64,
    pub request_timeout: Duration,
}

impl Default for FuturesClientConfig {
    fn default() -> Self {
        Self {
            rest_url: DEFAULT_REST_URL.to_string(),
            recv_window_ms: 5_000,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Read-only client for the signed futures account endpoints.
pub struct FuturesClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    recv_window_ms: u64,
}

impl FuturesClient {
    pub fn new(config: FuturesClientConfig, credentials: Credentials) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ExchangeError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms: config.recv_window_ms,
        })
    }

    /// Order history of `symbol`, newest `limit` orders (clamped to 1..=1000).
    pub async fn all_orders(&self, symbol: &str, limit: u32) -> ExchangeResult<Vec<OrderRecord>> {
        let limit = limit.clamp(1, MAX_ORDER_HISTORY_LIMIT).to_string();
        let raw: Vec<RawOrder> = self
            .signed_get(ALL_ORDERS_PATH, &[("symbol", symbol), ("limit", &limit)])
            .await?;
        debug!(symbol, count = raw.len(), "Fetched order history");
        Ok(raw.into_iter().map(OrderRecord::from).collect())
    }

    /// Every position row the account reports, open or not.
    pub async fn position_risk(&self) -> ExchangeResult<Vec<PositionSnapshot>> {
        let raw: Vec<RawPositionRisk> = self.signed_get(POSITION_RISK_PATH, &[]).await?;
        debug!(count = raw.len(), "Fetched position risk");
        Ok(raw.into_iter().map(PositionSnapshot::from).collect())
    }

    /// Hedge mode maps to side-tagged accounting, one-way to net balance.
    pub async fn dual_side_position(&self) -> ExchangeResult<AccountingMode> {
        let resp: PositionModeResponse = self.signed_get(POSITION_MODE_PATH, &[]).await?;
        Ok(if resp.dual_side_position {
            AccountingMode::SideTagged
        } else {
            AccountingMode::NetBalance
        })
    }

    async fn signed_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> ExchangeResult<T> {
        let query = self.signed_query(params, Utc::now().timestamp_millis())?;
        let url = format!("{}{}?{}", self.base_url, path, query);

        let response = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", self.credentials.api_key())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let err = ExchangeError::from_response(status.as_u16(), &body);
            warn!(path, status = status.as_u16(), error = %err, "Binance request failed");
            return Err(err);
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Query string with `recvWindow`, `timestamp` and the trailing signature.
    fn signed_query(&self, params: &[(&str, &str)], timestamp_ms: i64) -> ExchangeResult<String> {
        let mut query: String = params
            .iter()
            .map(|(k, v)| format!("{k}={v}&"))
            .collect();
        query.push_str(&format!(
            "recvWindow={}&timestamp={}",
            self.recv_window_ms, timestamp_ms
        ));
        let signature = self.credentials.sign(&query)?;
        Ok(format!("{query}&signature={signature}"))
    }
}
