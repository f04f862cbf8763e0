use chrono::{Duration, NaiveDateTime, Timelike};

use crate::error::{TrackerError, TrackerResult};

/// One coding interval. A live session has no `end_time` yet and its
/// `duration` is refreshed by the timer; a finalized session is immutable
/// until it is replaced through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingSession {
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub duration: Duration,
}

impl CodingSession {
    pub fn live(start_time: NaiveDateTime) -> Self {
        Self {
            id: 0,
            start_time: truncate_to_seconds(start_time),
            end_time: None,
            duration: Duration::zero(),
        }
    }

    /// Builds a finalized, not yet persisted session. `start` must be
    /// strictly earlier than `end`.
    pub fn finalized(start_time: NaiveDateTime, end_time: NaiveDateTime) -> TrackerResult<Self> {
        let start_time = truncate_to_seconds(start_time);
        let end_time = truncate_to_seconds(end_time);
        if start_time >= end_time {
            return Err(TrackerError::invalid(format!(
                "session start {start_time} must be earlier than its end {end_time}"
            )));
        }

        Ok(Self {
            id: 0,
            start_time,
            end_time: Some(end_time),
            duration: end_time - start_time,
        })
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn is_live(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Persisted timestamps carry whole seconds only.
pub fn truncate_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}
