//! Prometheus metrics and structured logging for holdwatch.
//!
//! - Structured logging with tracing (pretty in development, JSON in production)
//! - Prometheus counters for malformed input, limit checks, gateway and
//!   notification failures
//! - Optional `/metrics` HTTP endpoint

pub mod error;
pub mod logging;
pub mod metrics;
pub mod server;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging_with;
pub use metrics::Metrics;
pub use server::serve_metrics;
