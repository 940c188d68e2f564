//! # Rate Limit Policy
//!
//! Converts a published "calls per time span" quota into the minimum delay
//! between two consecutive remote calls.
//!
//! The calculation assumes a sequential, gap-free stream of calls: a policy of
//! `calls` per `time_span` units allows one call every
//! `time_unit.to_millis(time_span) / calls` milliseconds (floored).
//!
//! # Examples
//!
//! ```
//! use ledger_scan::domain::value_objects::rate_limit::{RateLimitPolicy, TimeUnit};
//!
//! let policy = RateLimitPolicy::try_new(3, 1, TimeUnit::Minutes).unwrap();
//! assert_eq!(policy.delay_millis(), 20_000);
//! ```

use crate::domain::value_objects::enums::ParseEnumError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Unit of the time span in a [`RateLimitPolicy`].
///
/// Parsing is case-insensitive, so `"seconds"` and `"SECONDS"` both work in
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    /// Nanoseconds.
    Nanoseconds,
    /// Microseconds.
    Microseconds,
    /// Milliseconds.
    Milliseconds,
    /// Seconds.
    #[default]
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

impl TimeUnit {
    /// Converts `amount` of this unit to milliseconds.
    ///
    /// Sub-millisecond units are floored; large values saturate at `u64::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledger_scan::domain::value_objects::rate_limit::TimeUnit;
    ///
    /// assert_eq!(TimeUnit::Hours.to_millis(2), 7_200_000);
    /// assert_eq!(TimeUnit::Microseconds.to_millis(1_999), 1);
    /// ```
    #[must_use]
    pub const fn to_millis(self, amount: u64) -> u64 {
        match self {
            Self::Nanoseconds => amount / 1_000_000,
            Self::Microseconds => amount / 1_000,
            Self::Milliseconds => amount,
            Self::Seconds => amount.saturating_mul(1_000),
            Self::Minutes => amount.saturating_mul(60_000),
            Self::Hours => amount.saturating_mul(3_600_000),
            Self::Days => amount.saturating_mul(86_400_000),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nanoseconds => write!(f, "NANOSECONDS"),
            Self::Microseconds => write!(f, "MICROSECONDS"),
            Self::Milliseconds => write!(f, "MILLISECONDS"),
            Self::Seconds => write!(f, "SECONDS"),
            Self::Minutes => write!(f, "MINUTES"),
            Self::Hours => write!(f, "HOURS"),
            Self::Days => write!(f, "DAYS"),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NANOSECONDS" => Ok(Self::Nanoseconds),
            "MICROSECONDS" => Ok(Self::Microseconds),
            "MILLISECONDS" => Ok(Self::Milliseconds),
            "SECONDS" => Ok(Self::Seconds),
            "MINUTES" => Ok(Self::Minutes),
            "HOURS" => Ok(Self::Hours),
            "DAYS" => Ok(Self::Days),
            _ => Err(ParseEnumError::InvalidValue("TimeUnit", s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for TimeUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error constructing a [`RateLimitPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RateLimitError {
    /// The policy allows zero calls.
    #[error("rate limit must allow at least one call")]
    ZeroCalls,
    /// The policy has an empty time span.
    #[error("rate limit time span must be at least one unit")]
    ZeroTimeSpan,
}

/// A "calls per time span" rate limit.
///
/// # Invariants
///
/// - `calls >= 1` and `time_span >= 1`, enforced by the field types. Zero
///   is rejected at construction, never clamped.
///
/// The default is one call per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Calls allowed per time span.
    calls: NonZeroU32,
    /// Length of the time span, in `time_unit`.
    time_span: NonZeroU32,
    /// Unit of the time span.
    time_unit: TimeUnit,
}

impl RateLimitPolicy {
    /// Creates a policy from already validated parts.
    #[must_use]
    pub const fn new(calls: NonZeroU32, time_span: NonZeroU32, time_unit: TimeUnit) -> Self {
        Self {
            calls,
            time_span,
            time_unit,
        }
    }

    /// Creates a policy from raw counts.
    ///
    /// # Errors
    ///
    /// - `RateLimitError::ZeroCalls` if `calls` is zero
    /// - `RateLimitError::ZeroTimeSpan` if `time_span` is zero
    pub fn try_new(calls: u32, time_span: u32, time_unit: TimeUnit) -> Result<Self, RateLimitError> {
        let calls = NonZeroU32::new(calls).ok_or(RateLimitError::ZeroCalls)?;
        let time_span = NonZeroU32::new(time_span).ok_or(RateLimitError::ZeroTimeSpan)?;
        Ok(Self::new(calls, time_span, time_unit))
    }

    /// Returns the number of calls allowed per time span.
    #[inline]
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.get()
    }

    /// Returns the time span amount.
    #[inline]
    #[must_use]
    pub fn time_span(&self) -> u32 {
        self.time_span.get()
    }

    /// Returns the time unit.
    #[inline]
    #[must_use]
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Minimum milliseconds between two consecutive calls.
    ///
    /// A rate faster than one call per millisecond yields `0`, meaning no
    /// pacing is applied.
    #[must_use]
    pub fn delay_millis(&self) -> u64 {
        self.time_unit.to_millis(u64::from(self.time_span.get())) / u64::from(self.calls.get())
    }

    /// [`delay_millis`](Self::delay_millis) as a `Duration`.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis())
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(NonZeroU32::MIN, NonZeroU32::MIN, TimeUnit::Seconds)
    }
}

impl fmt::Display for RateLimitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} calls per {} {}",
            self.calls, self.time_span, self.time_unit
        )
    }
}

/// Minimum milliseconds between two consecutive calls under `policy`.
#[inline]
#[must_use]
pub fn delay_millis(policy: &RateLimitPolicy) -> u64 {
    policy.delay_millis()
}
