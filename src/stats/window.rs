use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime};

use crate::error::{TrackerError, TrackerResult};
use crate::models::CodingSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }

    /// Empty input and `none` mean "no window".
    pub fn parse_optional(value: &str) -> TrackerResult<Option<TimeUnit>> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl FromStr for TimeUnit {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "days" => Ok(TimeUnit::Days),
            "weeks" => Ok(TimeUnit::Weeks),
            "months" => Ok(TimeUnit::Months),
            "years" => Ok(TimeUnit::Years),
            other => Err(TrackerError::invalid(format!(
                "unknown time unit '{other}' (expected days, weeks, months or years)"
            ))),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trailing interval such as "the last 2 weeks".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub unit: TimeUnit,
    pub count: u32,
}

impl Window {
    pub fn new(unit: TimeUnit, count: u32) -> TrackerResult<Self> {
        if count == 0 {
            return Err(TrackerError::invalid("window count must be at least 1"));
        }
        Ok(Self { unit, count })
    }

    /// Oldest instant still outside the window. Months and years step by
    /// calendar months, clamping to the end of shorter months.
    pub fn cutoff(&self, now: NaiveDateTime) -> TrackerResult<NaiveDateTime> {
        let count = i64::from(self.count);
        let cutoff = match self.unit {
            TimeUnit::Days => Duration::try_days(count).and_then(|d| now.checked_sub_signed(d)),
            TimeUnit::Weeks => Duration::try_weeks(count).and_then(|d| now.checked_sub_signed(d)),
            TimeUnit::Months => now.checked_sub_months(Months::new(self.count)),
            TimeUnit::Years => self
                .count
                .checked_mul(12)
                .and_then(|months| now.checked_sub_months(Months::new(months))),
        };

        cutoff.ok_or_else(|| {
            TrackerError::invalid(format!(
                "a window of {} {} reaches outside the supported date range",
                self.count, self.unit
            ))
        })
    }
}

/// Keeps the sessions that started strictly after the window cutoff, in
/// input order. `None` keeps everything.
pub fn filter_window(
    sessions: &[CodingSession],
    window: Option<Window>,
    now: NaiveDateTime,
) -> TrackerResult<Vec<CodingSession>> {
    let Some(window) = window else {
        return Ok(sessions.to_vec());
    };

    let cutoff = window.cutoff(now)?;
    Ok(sessions
        .iter()
        .filter(|session| session.start_time > cutoff)
        .cloned()
        .collect())
}
