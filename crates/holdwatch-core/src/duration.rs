//! Holding-time durations written as `<magnitude><unit>`.
//!
//! Accepted units are `s`, `m`, `h` and `d` (case-insensitive); the
//! magnitude may be fractional, so `1.5d` is thirty-six hours.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::decimal::parse_decimal;
use crate::error::{CoreError, Result};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// A strictly positive duration with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HoldDuration {
    millis: u64,
}

impl HoldDuration {
    pub const FIVE_MINUTES: Self = Self {
        millis: 5 * MS_PER_MINUTE,
    };

    /// Create from milliseconds. Zero is rejected.
    pub fn from_millis(millis: u64) -> Result<Self> {
        if millis == 0 {
            return Err(CoreError::InvalidDuration(
                "duration must be greater than zero".to_string(),
            ));
        }
        Ok(Self { millis })
    }

    /// Parse text such as `12h`, `30m`, `1.5d` or `45S`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let mut chars = text.chars();
        let unit = chars
            .next_back()
            .ok_or_else(|| CoreError::InvalidDuration("empty duration".to_string()))?;
        let magnitude_text = chars.as_str();

        let unit_ms = match unit.to_ascii_lowercase() {
            's' => MS_PER_SECOND,
            'm' => MS_PER_MINUTE,
            'h' => MS_PER_HOUR,
            'd' => MS_PER_DAY,
            _ => {
                return Err(CoreError::InvalidDuration(format!(
                    "unknown unit {unit:?} in {text:?} (use s, m, h or d)"
                )))
            }
        };

        let magnitude = parse_decimal(magnitude_text).map_err(|_| {
            CoreError::InvalidDuration(format!("invalid number {magnitude_text:?} in {text:?}"))
        })?;
        if magnitude <= Decimal::ZERO {
            return Err(CoreError::InvalidDuration(format!(
                "{text:?} must be greater than zero"
            )));
        }

        let millis = magnitude
            .checked_mul(Decimal::from(unit_ms))
            .and_then(|total| total.trunc().to_u64())
            .ok_or_else(|| CoreError::InvalidDuration(format!("{text:?} is out of range")))?;

        Self::from_millis(millis)
            .map_err(|_| CoreError::InvalidDuration(format!("{text:?} is shorter than 1ms")))
    }

    #[inline]
    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    #[inline]
    pub fn as_std(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    /// Length in fractional minutes, for display.
    pub fn as_minutes_f64(&self) -> f64 {
        self.millis as f64 / MS_PER_MINUTE as f64
    }
}

impl fmt::Display for HoldDuration {
    /// Renders in the largest unit that represents the value exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.millis;
        if ms % MS_PER_DAY == 0 {
            write!(f, "{}d", ms / MS_PER_DAY)
        } else if ms % MS_PER_HOUR == 0 {
            write!(f, "{}h", ms / MS_PER_HOUR)
        } else if ms % MS_PER_MINUTE == 0 {
            write!(f, "{}m", ms / MS_PER_MINUTE)
        } else if ms % MS_PER_SECOND == 0 {
            write!(f, "{}s", ms / MS_PER_SECOND)
        } else {
            let seconds = Decimal::from(ms) / Decimal::from(MS_PER_SECOND);
            write!(f, "{}s", seconds.normalize())
        }
    }
}

impl FromStr for HoldDuration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HoldDuration {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<HoldDuration> for String {
    fn from(value: HoldDuration) -> Self {
        value.to_string()
    }
}

impl From<HoldDuration> for Duration {
    fn from(value: HoldDuration) -> Self {
        value.as_std()
    }
}
