//! Calendar-day keys and the clock that resolves them.
//!
//! A `DateKey` identifies one calendar day in canonical `YYYY-MM-DD` form.
//! The time-zone policy is chosen once for the whole system — the host's
//! local calendar day — and only `Clock` implementations ever consult it.
//! Streak arithmetic needs nothing beyond "today", "yesterday", and
//! equality between keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar-day identifier in canonical `YYYY-MM-DD` form.
///
/// Serializes as the canonical string; ordering is calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a key from calendar components; `None` for invalid dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The previous calendar day, crossing month and year boundaries.
    /// Saturates at the calendar origin.
    pub fn pred(self) -> Self {
        Self(self.0.pred_opt().unwrap_or(self.0))
    }

    /// The next calendar day. Saturates at the calendar horizon.
    pub fn succ(self) -> Self {
        Self(self.0.succ_opt().unwrap_or(self.0))
    }

    /// The key `days` calendar days away (negative goes back). Saturates at
    /// the calendar bounds.
    pub fn offset(self, days: i64) -> Self {
        self.0
            .checked_add_signed(chrono::Duration::days(days))
            .map(Self)
            .unwrap_or(self)
    }

    pub fn as_date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Returned when a string is not a canonical `YYYY-MM-DD` day.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid date key (expected YYYY-MM-DD): {0}")]
pub struct DateKeyParseError(String);

impl FromStr for DateKey {
    type Err = DateKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateKeyParseError(s.to_string()))
    }
}

/// Resolves "today" and "yesterday" under the system's time-zone policy.
///
/// `yesterday` is always exactly one calendar day before `today`.
pub trait Clock: Send + Sync {
    fn today(&self) -> DateKey;

    fn yesterday(&self) -> DateKey {
        self.today().pred()
    }
}

/// Wall-clock implementation: the host's local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        DateKey(chrono::Local::now().date_naive())
    }
}

/// Pins "today" to a fixed key (for testing).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateKey);

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.0
    }
}
