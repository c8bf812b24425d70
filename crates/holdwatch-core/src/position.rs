//! Position direction, accounting mode and venue position snapshots.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{parse_decimal, Price, Quantity};
use crate::error::{CoreError, Result};
use crate::order::{OrderSide, PositionSide};

/// Threshold below which a reported position size counts as closed.
pub const OPEN_SIZE_EPSILON: Decimal = dec!(0.0000000001);

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// The order side that opens (or adds to) a position in this direction.
    pub fn opening_side(&self) -> OrderSide {
        match self {
            Self::Long => OrderSide::Buy,
            Self::Short => OrderSide::Sell,
        }
    }

    /// Whether an order on `side` opens or adds to this direction.
    pub fn is_opened_by(&self, side: OrderSide) -> bool {
        self.opening_side() == side
    }

    /// The hedge-mode ledger holding this direction.
    pub fn ledger(&self) -> PositionSide {
        match self {
            Self::Long => PositionSide::Long,
            Self::Short => PositionSide::Short,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// How the venue nets orders into positions.
///
/// - `NetBalance`: one-way mode, a single signed position per symbol.
/// - `SideTagged`: hedge mode, independent long and short ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountingMode {
    #[default]
    NetBalance,
    SideTagged,
}

impl fmt::Display for AccountingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetBalance => write!(f, "net_balance"),
            Self::SideTagged => write!(f, "side_tagged"),
        }
    }
}

/// Current position state for one symbol (and ledger, in hedge mode).
///
/// Numbers stay as the venue's strings; accessors parse them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub symbol: String,
    /// Signed size; negative means short.
    pub position_amt: String,
    pub entry_price: String,
    pub unrealized_pnl: String,
    #[serde(default)]
    pub position_side: PositionSide,
}

impl PositionSnapshot {
    /// Signed position size.
    pub fn size(&self) -> Result<Quantity> {
        parse_decimal(&self.position_amt)
            .map(Quantity::new)
            .map_err(|e| CoreError::InvalidQuantity(format!("{:?}: {e}", self.position_amt)))
    }

    pub fn entry_price(&self) -> Result<Price> {
        parse_decimal(&self.entry_price)
            .map(Price::new)
            .map_err(|e| CoreError::InvalidPrice(format!("{:?}: {e}", self.entry_price)))
    }

    /// Unrealized PnL; absent or malformed values read as zero.
    pub fn unrealized_pnl(&self) -> Decimal {
        parse_decimal(&self.unrealized_pnl).unwrap_or(Decimal::ZERO)
    }

    /// A snapshot is open when both size and entry price are non-zero.
    pub fn is_open(&self) -> Result<bool> {
        let size = self.size()?;
        let entry = self.entry_price()?;
        Ok(!size.is_flat(OPEN_SIZE_EPSILON) && entry.inner() > OPEN_SIZE_EPSILON)
    }

    /// Direction of the position: the hedge tag when present, else the
    /// sign of the size.
    pub fn direction(&self) -> Result<Direction> {
        match self.position_side {
            PositionSide::Long => Ok(Direction::Long),
            PositionSide::Short => Ok(Direction::Short),
            PositionSide::Both => {
                let size = self.size()?;
                if size.inner().is_sign_negative() && !size.is_zero() {
                    Ok(Direction::Short)
                } else {
                    Ok(Direction::Long)
                }
            }
        }
    }
}
