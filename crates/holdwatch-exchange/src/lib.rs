//! Exchange gateway for holdwatch.
//!
//! Read-only access to a Binance USDⓈ-M futures account: order history,
//! open positions and the account's position mode. Requests are signed
//! with HMAC-SHA256; failures are classified so callers can tell
//! authorization problems from transient ones.

pub mod client;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod signer;

pub use client::{FuturesClient, FuturesClientConfig, DEFAULT_REST_URL};
pub use error::{ErrorKind, ExchangeError, ExchangeResult};
pub use gateway::ExchangeGateway;
pub use signer::Credentials;
