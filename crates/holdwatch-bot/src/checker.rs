//! Periodic holding-limit checker.

use holdwatch_notify::{ChatTarget, Notifier, TextFormat};
use holdwatch_persistence::LimitStore;
use holdwatch_telemetry::Metrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::render;
use crate::service::PositionsService;

/// Result of one check pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    NoChat,
    NoRules,
    /// Positions could not be fetched.
    Failed,
    Checked { evaluated: usize, exceeded: usize },
}

pub struct LimitChecker {
    service: Arc<PositionsService>,
    store: Arc<dyn LimitStore>,
    notifier: Arc<dyn Notifier>,
    chat: watch::Receiver<Option<ChatTarget>>,
    interval: watch::Receiver<Duration>,
    cancel: CancellationToken,
}

impl LimitChecker {
    pub fn new(
        service: Arc<PositionsService>,
        store: Arc<dyn LimitStore>,
        notifier: Arc<dyn Notifier>,
        chat: watch::Receiver<Option<ChatTarget>>,
        interval: watch::Receiver<Duration>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            service,
            store,
            notifier,
            chat,
            interval,
            cancel,
        }
    }

    /// Check every interval until cancelled.
    ///
    /// A new interval restarts the wait with the new period.
    pub async fn run(self) {
        let mut interval = self.interval.clone();
        let mut interval_open = true;
        let mut period = *interval.borrow_and_update();
        info!(?period, "Limit checker started");

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                changed = interval.changed(), if interval_open => {
                    if changed.is_err() {
                        interval_open = false;
                    }
                }
                _ = tokio::time::sleep(period) => {
                    self.check_once(crate::now_ms()).await;
                }
            }

            let next = *interval.borrow_and_update();
            if next != period {
                info!(from = ?period, to = ?next, "Check interval changed");
                period = next;
            }
        }

        info!("Limit checker stopped");
    }

    /// One pass: evaluate every position that has a rule and send a single
    /// combined alert for those over their limit.
    pub async fn check_once(&self, now_ms: u64) -> CheckOutcome {
        let chat = *self.chat.borrow();
        let Some(chat) = chat else {
            debug!("No chat to alert yet, skipping check");
            return CheckOutcome::NoChat;
        };

        let rules = self.store.load().rules_by_asset();
        if rules.is_empty() {
            debug!("No limits set, skipping check");
            return CheckOutcome::NoRules;
        }

        let positions = match self.service.open_positions().await {
            Ok(positions) => positions,
            Err(e) => {
                error!(error = %e, "Failed to fetch positions for limit check");
                return CheckOutcome::Failed;
            }
        };

        let mut evaluated = 0;
        let mut exceeded = Vec::new();
        for snapshot in positions {
            let asset = holdwatch_core::base_asset(&snapshot.symbol);
            let Some(rule) = rules.get(&asset) else {
                continue;
            };
            evaluated += 1;
            let view = self.service.report_for(snapshot, Some(rule), now_ms).await;
            if view.is_exceeded() {
                info!(
                    symbol = %view.snapshot.symbol,
                    age_ms = view.age_ms(now_ms),
                    limit = %rule.limit,
                    "Position exceeded holding limit"
                );
                Metrics::limit_exceeded(&asset);
                exceeded.push(view);
            }
        }

        Metrics::limit_check();
        if !exceeded.is_empty() {
            let alert = render::limit_alert(&exceeded, now_ms);
            match self.notifier.send(chat, &alert, TextFormat::Html).await {
                Ok(()) => info!(count = exceeded.len(), "Sent limit alert"),
                Err(e) => warn!(error = %e, "Failed to send limit alert"),
            }
        }

        CheckOutcome::Checked {
            evaluated,
            exceeded: exceeded.len(),
        }
    }
}
