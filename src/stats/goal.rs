use chrono::Duration;

use crate::error::{TrackerError, TrackerResult};
use crate::models::CodingSession;

use super::aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalProjection {
    /// Goal minus everything logged so far. Negative once the goal is passed.
    pub time_remaining: Duration,
    pub daily_pace: Duration,
}

impl GoalProjection {
    pub fn is_met(&self) -> bool {
        self.time_remaining <= Duration::zero()
    }
}

/// Projects how much coding per day is needed to reach `target_hours`
/// across the whole history within `days_remaining` days.
pub fn project_goal(
    sessions: &[CodingSession],
    target_hours: i64,
    days_remaining: i32,
) -> TrackerResult<GoalProjection> {
    if days_remaining <= 0 {
        return Err(TrackerError::invalid(format!(
            "days remaining must be positive, got {days_remaining}"
        )));
    }
    if target_hours < 0 {
        return Err(TrackerError::invalid(format!(
            "goal hours cannot be negative, got {target_hours}"
        )));
    }

    let goal = Duration::try_hours(target_hours).ok_or_else(|| {
        TrackerError::invalid(format!("goal of {target_hours} hours is too large"))
    })?;
    let logged = aggregate(sessions).total;
    let time_remaining = goal - logged;

    Ok(GoalProjection {
        time_remaining,
        daily_pace: time_remaining / days_remaining,
    })
}
