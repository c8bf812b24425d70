//! Positions service: turns gateway data into annotated position views.

use holdwatch_core::{
    base_asset, AccountingMode, Direction, LimitRule, PositionSnapshot,
};
use holdwatch_exchange::{ExchangeGateway, ExchangeResult};
use holdwatch_position::{evaluate, EpisodeReport, LimitStatus};
use holdwatch_telemetry::Metrics;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One open position with its episode start, fill count and limit state.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionView {
    pub snapshot: PositionSnapshot,
    pub direction: Direction,
    /// Episode start. Equals the evaluation time when it could not be
    /// reconstructed.
    pub opened_at_ms: u64,
    pub fill_count: usize,
    pub limit: Option<(LimitRule, LimitStatus)>,
}

impl PositionView {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.opened_at_ms)
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(&self.limit, Some((_, status)) if status.is_exceeded())
    }

    pub fn asset(&self) -> String {
        base_asset(&self.snapshot.symbol)
    }
}

pub struct PositionsService {
    gateway: Arc<dyn ExchangeGateway>,
    mode: AccountingMode,
    history_limit: u32,
}

impl PositionsService {
    pub fn new(gateway: Arc<dyn ExchangeGateway>, mode: AccountingMode, history_limit: u32) -> Self {
        Self {
            gateway,
            mode,
            history_limit,
        }
    }

    pub fn mode(&self) -> AccountingMode {
        self.mode
    }

    /// Open positions only: non-zero size and a positive entry price.
    pub async fn open_positions(&self) -> ExchangeResult<Vec<PositionSnapshot>> {
        let rows = self.gateway.open_positions().await?;
        let total = rows.len();
        let open: Vec<PositionSnapshot> = rows
            .into_iter()
            .filter(|snapshot| match snapshot.is_open() {
                Ok(open) => open,
                Err(e) => {
                    warn!(symbol = %snapshot.symbol, error = %e, "Skipping unparsable position");
                    false
                }
            })
            .collect();

        debug!(open = open.len(), total, "Filtered open positions");
        Metrics::open_positions(open.len());
        Ok(open)
    }

    pub fn direction_of(snapshot: &PositionSnapshot) -> Direction {
        snapshot.direction().unwrap_or(Direction::Long)
    }

    /// Reconstruct the episode of `snapshot` and evaluate `rule` against it.
    pub async fn report_for(
        &self,
        snapshot: PositionSnapshot,
        rule: Option<&LimitRule>,
        now_ms: u64,
    ) -> PositionView {
        let direction = Self::direction_of(&snapshot);

        let report = match self
            .gateway
            .list_orders(&snapshot.symbol, self.history_limit)
            .await
        {
            Ok(orders) => {
                let report = EpisodeReport::from_orders(&orders, direction, self.mode);
                if report.opened_at_ms.is_none() {
                    warn!(
                        symbol = %snapshot.symbol,
                        %direction,
                        orders = orders.len(),
                        "No opening fill in history, using current time"
                    );
                }
                report
            }
            Err(e) => {
                warn!(symbol = %snapshot.symbol, error = %e, "Failed to fetch order history");
                EpisodeReport {
                    opened_at_ms: None,
                    fill_count: 0,
                }
            }
        };

        let opened_at_ms = report.opened_at_or(now_ms);
        let limit = rule.map(|rule| (rule.clone(), evaluate(now_ms, opened_at_ms, rule.limit)));

        debug!(
            symbol = %snapshot.symbol,
            %direction,
            opened_at_ms,
            fill_count = report.fill_count,
            "Position episode"
        );

        PositionView {
            snapshot,
            direction,
            opened_at_ms,
            fill_count: report.fill_count,
            limit,
        }
    }

    /// Views of every open position, with rules looked up by base asset.
    pub async fn reports(
        &self,
        rules: &HashMap<String, LimitRule>,
        now_ms: u64,
    ) -> ExchangeResult<Vec<PositionView>> {
        let positions = self.open_positions().await?;
        let mut views = Vec::with_capacity(positions.len());
        for snapshot in positions {
            let rule = rules.get(&base_asset(&snapshot.symbol));
            views.push(self.report_for(snapshot, rule, now_ms).await);
        }
        Ok(views)
    }
}

/// The configured mode, or the account's mode for `None`.
pub async fn resolve_mode(
    gateway: &dyn ExchangeGateway,
    fixed: Option<AccountingMode>,
) -> AccountingMode {
    if let Some(mode) = fixed {
        info!(%mode, "Using configured accounting mode");
        return mode;
    }
    match gateway.position_mode().await {
        Ok(mode) => {
            info!(%mode, "Detected accounting mode");
            mode
        }
        Err(e) => {
            warn!(error = %e, "Failed to detect accounting mode, assuming net_balance");
            AccountingMode::NetBalance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use holdwatch_core::{HoldDuration, OrderId, OrderRecord, OrderSide, OrderStatus, PositionSide};
    use holdwatch_exchange::ExchangeError;

    const HOUR: u64 = 3_600_000;

    struct StaticGateway {
        positions: Vec<PositionSnapshot>,
        orders: Option<Vec<OrderRecord>>,
    }

    #[async_trait]
    impl ExchangeGateway for StaticGateway {
        async fn list_orders(&self, _symbol: &str, _limit: u32) -> ExchangeResult<Vec<OrderRecord>> {
            self.orders
                .clone()
                .ok_or_else(|| ExchangeError::Network("connection reset".into()))
        }

        async fn open_positions(&self) -> ExchangeResult<Vec<PositionSnapshot>> {
            Ok(self.positions.clone())
        }

        async fn position_mode(&self) -> ExchangeResult<AccountingMode> {
            Err(ExchangeError::Timeout("position mode".into()))
        }
    }

    fn snapshot(symbol: &str, amt: &str, entry: &str) -> PositionSnapshot {
        PositionSnapshot {
            symbol: symbol.into(),
            position_amt: amt.into(),
            entry_price: entry.into(),
            unrealized_pnl: "0".into(),
            position_side: PositionSide::Both,
        }
    }

    fn buy(id: u64, qty: &str, time_ms: u64) -> OrderRecord {
        OrderRecord {
            id: OrderId(id),
            symbol: "LSKUSDT".into(),
            side: OrderSide::Buy,
            status: OrderStatus::Filled,
            executed_qty: qty.into(),
            time_ms,
            update_time_ms: time_ms,
            position_side: PositionSide::Both,
        }
    }

    fn service(gateway: StaticGateway) -> PositionsService {
        PositionsService::new(Arc::new(gateway), AccountingMode::NetBalance, 1000)
    }

    #[tokio::test]
    async fn test_open_positions_filters_closed_rows() {
        let svc = service(StaticGateway {
            positions: vec![
                snapshot("LSKUSDT", "100", "1.2"),
                snapshot("BTCUSDT", "0.000", "0.0"),
                snapshot("ETHUSDT", "0.00000000001", "2000"),
                snapshot("XRPUSDT", "-5", "0"),
                snapshot("BADUSDT", "abc", "1"),
                snapshot("SOLUSDT", "-3", "150"),
            ],
            orders: Some(vec![]),
        });
        let open = svc.open_positions().await.unwrap();
        let symbols: Vec<_> = open.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["LSKUSDT", "SOLUSDT"]);
        assert_eq!(PositionsService::direction_of(&open[1]), Direction::Short);
    }

    #[tokio::test]
    async fn test_report_evaluates_rule() {
        let now = 20 * HOUR;
        let svc = service(StaticGateway {
            positions: vec![],
            orders: Some(vec![buy(1, "100", 7 * HOUR), buy(2, "50", 8 * HOUR)]),
        });
        let rule = LimitRule::new("LSK", HoldDuration::parse("12h").unwrap());
        let view = svc
            .report_for(snapshot("LSKUSDT", "150", "1.2"), Some(&rule), now)
            .await;

        assert_eq!(view.opened_at_ms, 7 * HOUR);
        assert_eq!(view.fill_count, 2);
        assert_eq!(view.age_ms(now), 13 * HOUR);
        assert!(view.is_exceeded());
        assert_eq!(
            view.limit.unwrap().1,
            LimitStatus::Exceeded { overshoot_ms: HOUR }
        );
    }

    #[tokio::test]
    async fn test_history_failure_means_zero_age() {
        let now = 5 * HOUR;
        let svc = service(StaticGateway {
            positions: vec![],
            orders: None,
        });
        let rule = LimitRule::new("LSK", HoldDuration::parse("1m").unwrap());
        let view = svc
            .report_for(snapshot("LSKUSDT", "1", "1"), Some(&rule), now)
            .await;
        assert_eq!(view.opened_at_ms, now);
        assert_eq!(view.fill_count, 0);
        assert!(!view.is_exceeded());
    }

    #[tokio::test]
    async fn test_reports_match_rules_by_base_asset() {
        let svc = service(StaticGateway {
            positions: vec![snapshot("LSKUSDT", "1", "1"), snapshot("BTCUSDT", "1", "1")],
            orders: Some(vec![buy(1, "1", HOUR)]),
        });
        let rules: HashMap<_, _> = [(
            "LSK".to_string(),
            LimitRule::new("LSK", HoldDuration::parse("12h").unwrap()),
        )]
        .into_iter()
        .collect();
        let views = svc.reports(&rules, 2 * HOUR).await.unwrap();
        assert!(views[0].limit.is_some());
        assert!(views[1].limit.is_none());
    }

    #[tokio::test]
    async fn test_resolve_mode_falls_back_to_net_balance() {
        let gateway = StaticGateway {
            positions: vec![],
            orders: None,
        };
        assert_eq!(resolve_mode(&gateway, None).await, AccountingMode::NetBalance);
        assert_eq!(
            resolve_mode(&gateway, Some(AccountingMode::SideTagged)).await,
            AccountingMode::SideTagged
        );
    }
}
