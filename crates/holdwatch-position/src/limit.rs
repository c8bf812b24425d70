//! Holding-limit evaluation.

use holdwatch_core::HoldDuration;
use serde::{Deserialize, Serialize};

/// Where an episode stands against its holding limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LimitStatus {
    Within { remaining_ms: u64 },
    Exceeded { overshoot_ms: u64 },
}

impl LimitStatus {
    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::Exceeded { .. })
    }

    /// Remaining time when within the limit, overshoot when exceeded.
    pub fn magnitude_ms(&self) -> u64 {
        match *self {
            Self::Within { remaining_ms } => remaining_ms,
            Self::Exceeded { overshoot_ms } => overshoot_ms,
        }
    }
}

/// Age of an episode. A start in the future (clock skew) yields zero.
#[inline]
pub fn episode_age_ms(now_ms: u64, start_ms: u64) -> u64 {
    now_ms.saturating_sub(start_ms)
}

/// Compare episode age against `limit`.
///
/// An age exactly equal to the limit is still within it.
#[must_use]
pub fn evaluate(now_ms: u64, start_ms: u64, limit: HoldDuration) -> LimitStatus {
    let age_ms = episode_age_ms(now_ms, start_ms);
    let limit_ms = limit.as_millis();
    if age_ms > limit_ms {
        LimitStatus::Exceeded {
            overshoot_ms: age_ms - limit_ms,
        }
    } else {
        LimitStatus::Within {
            remaining_ms: limit_ms - age_ms,
        }
    }
}
