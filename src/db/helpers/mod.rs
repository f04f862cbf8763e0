use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// Month/day/year with a 12-hour clock, e.g. `3/7/2024 1:05:09 PM`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y %-I:%M:%S %p";

/// The textual date-time layout used for persisted timestamps and for
/// timestamps typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampFormat(String);

impl Default for TimestampFormat {
    fn default() -> Self {
        Self(DEFAULT_TIMESTAMP_FORMAT.to_string())
    }
}

impl TimestampFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    pub fn format(&self, value: &NaiveDateTime) -> String {
        value.format(self.pattern()).to_string()
    }

    pub fn parse(&self, value: &str) -> TrackerResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), self.pattern()).map_err(|err| {
            TrackerError::invalid(format!(
                "'{value}' does not match timestamp format '{}': {err}",
                self.pattern()
            ))
        })
    }
}

pub fn duration_to_secs(value: Duration) -> i64 {
    value.num_seconds()
}

pub fn duration_from_secs(value: i64, field: &str) -> Result<Duration> {
    if value < 0 {
        return Err(anyhow!("{field} contains negative value {value}"));
    }
    Duration::try_seconds(value).ok_or_else(|| anyhow!("{field} value {value} is out of range"))
}

pub fn parse_stored_datetime(
    format: &TimestampFormat,
    value: &str,
    field: &str,
) -> Result<NaiveDateTime> {
    format
        .parse(value)
        .map_err(|err| anyhow!("failed to parse {field}: {err}"))
}
