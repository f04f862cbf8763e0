use chrono::{Duration, NaiveDateTime};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{truncate_to_seconds, CodingSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// The single live session of this process, if any.
#[derive(Debug, Clone, Default)]
pub struct TimerState {
    pub status: TimerStatus,
    pub session: Option<CodingSession>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.session.as_ref().map(|session| session.start_time)
    }

    pub fn elapsed(&self) -> Duration {
        self.session
            .as_ref()
            .map(|session| session.duration)
            .unwrap_or_else(Duration::zero)
    }

    /// A session that was stopped but has not reached the store yet.
    pub fn unsaved(&self) -> Option<&CodingSession> {
        match self.status {
            TimerStatus::Stopped => self.session.as_ref(),
            _ => None,
        }
    }

    pub fn begin(&mut self, now: NaiveDateTime) -> TrackerResult<()> {
        if self.status == TimerStatus::Running {
            return Err(TrackerError::SessionActive);
        }
        if self.unsaved().is_some() {
            return Err(TrackerError::UnsavedSession);
        }

        *self = Self {
            status: TimerStatus::Running,
            session: Some(CodingSession::live(now)),
        };
        Ok(())
    }

    /// Recomputes the live duration as `now - start_time`.
    pub fn sync_elapsed(&mut self, now: NaiveDateTime) -> Duration {
        if self.status != TimerStatus::Running {
            return self.elapsed();
        }
        match self.session.as_mut() {
            Some(session) => {
                session.duration = (now - session.start_time).max(Duration::zero());
                session.duration
            }
            None => Duration::zero(),
        }
    }

    /// Ends the live session. The state is left `Stopped` holding the
    /// finalized record until the caller resets it after a successful write.
    /// An invalid interval leaves no record behind.
    pub fn finish(&mut self, now: NaiveDateTime) -> TrackerResult<CodingSession> {
        if self.status != TimerStatus::Running {
            return Err(TrackerError::NoActiveSession);
        }

        let live = self.session.take().ok_or(TrackerError::NoActiveSession)?;
        self.status = TimerStatus::Stopped;
        let finished = CodingSession::finalized(live.start_time, truncate_to_seconds(now))?;
        self.session = Some(finished.clone());
        Ok(finished)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
