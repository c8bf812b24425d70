//! The limits document and its edit operations.

use holdwatch_core::{HoldDuration, LimitRule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::error::{PersistenceError, PersistenceResult};

/// Interval used when none is stored or the stored one is invalid.
pub const DEFAULT_CHECK_INTERVAL: &str = "5m";

fn default_check_interval() -> String {
    DEFAULT_CHECK_INTERVAL.to_string()
}

/// One stored rule. `time` keeps the text the user typed (`"1.5d"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLimit {
    pub coin: String,
    pub time: String,
}

impl StoredLimit {
    pub fn duration(&self) -> PersistenceResult<HoldDuration> {
        Ok(HoldDuration::parse(&self.time)?)
    }
}

/// Whether an upsert replaced an existing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Added(HoldDuration),
    Updated(HoldDuration),
}

impl Upserted {
    pub fn duration(&self) -> HoldDuration {
        match *self {
            Self::Added(d) | Self::Updated(d) => d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsDocument {
    #[serde(default)]
    pub limits: Vec<StoredLimit>,
    #[serde(default = "default_check_interval")]
    pub check_interval: String,
}

impl Default for LimitsDocument {
    fn default() -> Self {
        Self {
            limits: Vec::new(),
            check_interval: default_check_interval(),
        }
    }
}

impl LimitsDocument {
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Add a rule or replace the duration of an existing one in place.
    ///
    /// The duration is validated first; on error nothing changes.
    pub fn upsert(&mut self, coin: &str, time: &str) -> PersistenceResult<Upserted> {
        let coin = normalize_coin(coin)?;
        let time = time.trim();
        let duration = HoldDuration::parse(time)?;

        match self
            .limits
            .iter_mut()
            .find(|limit| limit.coin.eq_ignore_ascii_case(&coin))
        {
            Some(existing) => {
                existing.coin = coin;
                existing.time = time.to_string();
                Ok(Upserted::Updated(duration))
            }
            None => {
                self.limits.push(StoredLimit {
                    coin,
                    time: time.to_string(),
                });
                Ok(Upserted::Added(duration))
            }
        }
    }

    /// Delete the rule for `coin`. Returns whether one existed.
    pub fn remove(&mut self, coin: &str) -> PersistenceResult<bool> {
        let coin = normalize_coin(coin)?;
        let before = self.limits.len();
        self.limits
            .retain(|limit| !limit.coin.eq_ignore_ascii_case(&coin));
        Ok(self.limits.len() != before)
    }

    /// Validate and store a new check interval.
    pub fn set_check_interval(&mut self, text: &str) -> PersistenceResult<HoldDuration> {
        let text = text.trim();
        let interval = HoldDuration::parse(text)?;
        self.check_interval = text.to_string();
        Ok(interval)
    }

    /// Stored interval, or the default when it no longer parses.
    pub fn check_interval(&self) -> HoldDuration {
        match HoldDuration::parse(&self.check_interval) {
            Ok(interval) => interval,
            Err(e) => {
                warn!(
                    check_interval = %self.check_interval,
                    error = %e,
                    "Invalid stored check interval, using default"
                );
                default_interval()
            }
        }
    }

    /// Parsed rules in stored order. Rules that no longer parse are skipped.
    pub fn rules(&self) -> Vec<LimitRule> {
        self.limits
            .iter()
            .filter_map(|limit| match limit.duration() {
                Ok(duration) => Some(LimitRule::new(&limit.coin, duration)),
                Err(e) => {
                    warn!(coin = %limit.coin, time = %limit.time, error = %e, "Skipping invalid limit");
                    None
                }
            })
            .collect()
    }

    /// Rules keyed by uppercased asset.
    pub fn rules_by_asset(&self) -> HashMap<String, LimitRule> {
        self.rules()
            .into_iter()
            .map(|rule| (rule.asset.clone(), rule))
            .collect()
    }
}

fn normalize_coin(coin: &str) -> PersistenceResult<String> {
    let coin = coin.trim().to_ascii_uppercase();
    if coin.is_empty() {
        return Err(PersistenceError::EmptyAsset);
    }
    Ok(coin)
}

pub(crate) fn default_interval() -> HoldDuration {
    HoldDuration::FIVE_MINUTES
}
