use chrono::{Local, NaiveDateTime};
use log::info;

use crate::error::{TrackerError, TrackerResult};
use crate::models::CodingSession;
use crate::stats::{
    aggregate, filter_window, project_goal, sort_sessions, GoalProjection, SortPolicy, TimeUnit,
    Totals, Window,
};

use super::SessionStore;

/// A validated request for past sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionQuery {
    pub window: Option<Window>,
    pub sort: SortPolicy,
}

impl SessionQuery {
    /// Builds a query from user-facing strings. An empty or `none` unit
    /// means no window, in which case `count` is ignored.
    pub fn parse(unit: &str, count: u32, sort: &str) -> TrackerResult<Self> {
        let window = match TimeUnit::parse_optional(unit)? {
            Some(unit) => Some(Window::new(unit, count)?),
            None => None,
        };

        Ok(Self {
            window,
            sort: sort.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub sessions: Vec<CodingSession>,
    /// Computed over the filtered sessions only.
    pub totals: Totals,
}

pub struct SessionService<S> {
    store: S,
}

impl<S: SessionStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn all(&self) -> TrackerResult<Vec<CodingSession>> {
        Ok(self.store.read_all().await?)
    }

    pub async fn query(&self, query: SessionQuery) -> TrackerResult<QueryResult> {
        self.query_at(query, Local::now().naive_local()).await
    }

    pub async fn query_at(
        &self,
        query: SessionQuery,
        now: NaiveDateTime,
    ) -> TrackerResult<QueryResult> {
        let snapshot = self.store.read_all().await?;
        let mut sessions = filter_window(&snapshot, query.window, now)?;
        let totals = aggregate(&sessions);
        sort_sessions(&mut sessions, query.sort);

        Ok(QueryResult { sessions, totals })
    }

    /// Goal projection over the entire history, regardless of any window.
    pub async fn goal(
        &self,
        target_hours: i64,
        days_remaining: i32,
    ) -> TrackerResult<GoalProjection> {
        let history = self.store.read_all().await?;
        project_goal(&history, target_hours, days_remaining)
    }

    pub async fn record(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> TrackerResult<CodingSession> {
        let session = CodingSession::finalized(start_time, end_time)?;
        self.save(session).await
    }

    /// Persists a finalized session and returns it with its new id.
    pub async fn save(&self, session: CodingSession) -> TrackerResult<CodingSession> {
        let end_time = session
            .end_time
            .ok_or_else(|| TrackerError::invalid("cannot store a session that is still running"))?;
        let id = self
            .store
            .insert(session.start_time, end_time, session.duration)
            .await?;
        Ok(session.with_id(id))
    }

    pub async fn update(
        &self,
        id: i64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> TrackerResult<CodingSession> {
        let session = CodingSession::finalized(start_time, end_time)?.with_id(id);
        self.store
            .update(id, session.start_time, end_time, session.duration)
            .await?;
        info!("Updated coding session {id}");
        Ok(session)
    }

    pub async fn delete(&self, id: i64) -> TrackerResult<bool> {
        Ok(self.store.delete(id).await?)
    }
}
