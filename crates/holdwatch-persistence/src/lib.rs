//! Per-asset holding limit storage for holdwatch.
//!
//! Limits and the check interval live in a small JSON document:
//!
//! ```json
//! {"limits":[{"coin":"LSK","time":"12h"}],"check_interval":"5m"}
//! ```

pub mod document;
pub mod error;
pub mod store;

pub use document::{LimitsDocument, StoredLimit, Upserted, DEFAULT_CHECK_INTERVAL};
pub use error::{PersistenceError, PersistenceResult};
pub use store::{JsonLimitStore, LimitStore, MemoryLimitStore};
