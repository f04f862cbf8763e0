use std::future::Future;

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};

use crate::models::CodingSession;

/// Persistence boundary for finalized sessions.
pub trait SessionStore: Send + Sync {
    /// Stores a new record and returns the id assigned to it.
    fn insert(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration: Duration,
    ) -> impl Future<Output = Result<i64>> + Send;

    /// Every stored record in id order.
    fn read_all(&self) -> impl Future<Output = Result<Vec<CodingSession>>> + Send;

    /// Insert-or-replace keyed by `id`.
    fn update(
        &self,
        id: i64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Returns whether a record was removed.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;
}
