//! Prometheus metrics for holdwatch.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric
//! names, which is a startup bug; it only happens during static
//! initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_int_gauge, Counter, CounterVec, IntGauge,
};

/// Historical orders skipped because of malformed fields.
/// Labels: reason (quantity/timestamp)
pub static MALFORMED_ORDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "holdwatch_malformed_orders_total",
        "Filled orders skipped during reconstruction because of malformed fields",
        &["reason"]
    )
    .unwrap()
});

/// Completed periodic limit checks.
pub static LIMIT_CHECKS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "holdwatch_limit_checks_total",
        "Completed periodic holding-limit checks"
    )
    .unwrap()
});

/// Positions found over their holding limit.
/// Labels: asset
pub static LIMIT_EXCEEDED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "holdwatch_limit_exceeded_total",
        "Positions found over their holding limit",
        &["asset"]
    )
    .unwrap()
});

/// Exchange gateway failures.
/// Labels: kind (auth/transient/other)
pub static GATEWAY_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "holdwatch_gateway_errors_total",
        "Exchange gateway request failures",
        &["kind"]
    )
    .unwrap()
});

pub static NOTIFICATIONS_SENT_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "holdwatch_notifications_sent_total",
        "Messages delivered through the notifier"
    )
    .unwrap()
});

pub static NOTIFICATION_FAILURES_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "holdwatch_notification_failures_total",
        "Messages the notifier failed to deliver"
    )
    .unwrap()
});

/// Open positions seen by the last positions fetch.
pub static OPEN_POSITIONS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "holdwatch_open_positions",
        "Open positions seen by the last positions fetch"
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a skipped order.
    pub fn malformed_order(reason: &str) {
        MALFORMED_ORDERS_TOTAL.with_label_values(&[reason]).inc();
    }

    pub fn limit_check() {
        LIMIT_CHECKS_TOTAL.inc();
    }

    pub fn limit_exceeded(asset: &str) {
        LIMIT_EXCEEDED_TOTAL.with_label_values(&[asset]).inc();
    }

    /// Record a gateway failure by classification.
    pub fn gateway_error(kind: &str) {
        GATEWAY_ERRORS_TOTAL.with_label_values(&[kind]).inc();
    }

    pub fn notification_sent() {
        NOTIFICATIONS_SENT_TOTAL.inc();
    }

    pub fn notification_failed() {
        NOTIFICATION_FAILURES_TOTAL.inc();
    }

    pub fn open_positions(count: usize) {
        OPEN_POSITIONS.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}
