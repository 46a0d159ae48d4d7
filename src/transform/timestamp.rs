//! `ts` → `start_time` conversion
//!
//! Log records carry `ts` as epoch milliseconds. The wall-clock datetime is
//! `ts` shifted by a fixed offset, UTC unless configured otherwise. The host
//! time zone is never consulted, so output does not depend on where the
//! pipeline runs.
//!
//! The same rule exists twice: as an engine SQL expression used by the
//! transformers, and as a `chrono` decomposition used to check results.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-offset rule for deriving `start_time` from `ts`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimestampRule {
    offset_seconds: i32,
}

impl TimestampRule {
    /// UTC, the default
    pub const UTC: TimestampRule = TimestampRule { offset_seconds: 0 };

    /// Parse `UTC`, `Z`, `+HH:MM` or `-HH:MM`
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("utc") || value == "Z" {
            return Ok(Self::UTC);
        }

        let invalid = || {
            Error::invalid_value(
                "transform.timezone",
                format!("expected UTC or ±HH:MM, got '{value}'"),
            )
        };

        let (sign, rest) = match value.chars().next() {
            Some('+') => (1, &value[1..]),
            Some('-') => (-1, &value[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        Ok(Self {
            offset_seconds: sign * (hours * 3600 + minutes * 60),
        })
    }

    /// Offset from UTC in milliseconds
    pub fn offset_millis(&self) -> i64 {
        i64::from(self.offset_seconds) * 1000
    }

    /// Engine expression producing the wall-clock `TIMESTAMP` for `column`
    pub fn sql_expr(&self, column: &str) -> String {
        match self.offset_millis() {
            0 => format!("epoch_ms(\"{column}\")"),
            offset => format!("epoch_ms(\"{column}\" + {offset})"),
        }
    }

    /// Wall-clock datetime for an epoch-millisecond timestamp
    pub fn to_datetime(&self, ts_millis: i64) -> Option<NaiveDateTime> {
        let offset = FixedOffset::east_opt(self.offset_seconds)?;
        DateTime::from_timestamp_millis(ts_millis).map(|dt| dt.with_timezone(&offset).naive_local())
    }

    /// Calendar decomposition of `ts_millis` (ISO week numbering)
    pub fn decompose(&self, ts_millis: i64) -> Option<TimeParts> {
        let start_time = self.to_datetime(ts_millis)?;
        Some(TimeParts {
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
        })
    }
}

impl TryFrom<String> for TimestampRule {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TimestampRule> for String {
    fn from(rule: TimestampRule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for TimestampRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset_seconds == 0 {
            return write!(f, "UTC");
        }
        let sign = if self.offset_seconds < 0 { '-' } else { '+' };
        let total = self.offset_seconds.abs();
        write!(f, "{sign}{:02}:{:02}", total / 3600, (total % 3600) / 60)
    }
}

/// One row of the `time` dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub start_time: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
}
