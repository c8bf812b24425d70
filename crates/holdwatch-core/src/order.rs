//! Order-related types and identifiers.
//!
//! Provides order side, status, hedge-mode position side and the historical
//! order record consumed by the episode reconstructor.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{parse_decimal, Quantity};
use crate::error::{CoreError, Result};

/// Venue-assigned order identifier.
///
/// Opaque: assignment order is not guaranteed to follow time, it only
/// serves as a deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order lifecycle status as reported by the venue.
///
/// Only `Filled` carries an executed quantity that counts towards a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    Rejected,
    Expired,
    ExpiredInMatch,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "NEW",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
            Self::ExpiredInMatch => "EXPIRED_IN_MATCH",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Hedge-mode ledger tag.
///
/// One-way accounts report `Both`; hedge accounts tag every order and
/// position with `Long` or `Short`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    #[default]
    Both,
    Long,
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Both => write!(f, "BOTH"),
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// Immutable historical order record.
///
/// The executed quantity stays as the raw venue string; parsing happens in
/// the normalizer so that malformed values can be reported, not lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub symbol: String,
    pub side: OrderSide,
    pub status: OrderStatus,
    /// Executed quantity as reported (e.g. "0.010").
    pub executed_qty: String,
    /// Creation time (Unix ms). Zero when the venue omitted it.
    pub time_ms: u64,
    /// Last update time (Unix ms).
    pub update_time_ms: u64,
    /// Hedge-mode ledger tag (`Both` in one-way mode).
    #[serde(default)]
    pub position_side: PositionSide,
}

impl OrderRecord {
    /// Timestamp used for ordering: creation time, falling back to the
    /// last update time when creation time is unset.
    #[inline]
    pub fn effective_time_ms(&self) -> u64 {
        if self.time_ms != 0 {
            self.time_ms
        } else {
            self.update_time_ms
        }
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.status.is_filled()
    }

    /// Parse the executed quantity.
    pub fn executed_quantity(&self) -> Result<Quantity> {
        parse_decimal(&self.executed_qty)
            .map(Quantity::new)
            .map_err(|e| CoreError::InvalidQuantity(format!("{:?}: {e}", self.executed_qty)))
    }
}
