//! Per-asset holding-time rules.

use serde::{Deserialize, Serialize};

use crate::duration::HoldDuration;
use crate::symbol::base_asset;

/// Maximum holding time for positions in one base asset.
///
/// Keyed by the uppercased base asset (`LSK`, not `LSKUSDT`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitRule {
    pub asset: String,
    pub limit: HoldDuration,
}

impl LimitRule {
    pub fn new(asset: impl AsRef<str>, limit: HoldDuration) -> Self {
        Self {
            asset: asset.as_ref().trim().to_ascii_uppercase(),
            limit,
        }
    }

    /// Whether this rule governs positions in `symbol`.
    pub fn applies_to(&self, symbol: &str) -> bool {
        base_asset(symbol) == self.asset
    }
}
