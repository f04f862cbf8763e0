use chrono::Duration;

use crate::models::CodingSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub total: Duration,
    pub average: Duration,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            total: Duration::zero(),
            average: Duration::zero(),
        }
    }
}

/// Sum and mean of session durations. The mean is truncated to whole
/// milliseconds and is zero for an empty slice.
pub fn aggregate(sessions: &[CodingSession]) -> Totals {
    let total = sessions
        .iter()
        .fold(Duration::zero(), |acc, session| acc + session.duration);

    let count = sessions.len() as i64;
    let average = if count > 0 {
        Duration::milliseconds(total.num_milliseconds() / count)
    } else {
        Duration::zero()
    };

    Totals { total, average }
}
