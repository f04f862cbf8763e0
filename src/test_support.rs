//! In-memory stores for exercising the service and timer without SQLite.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDateTime};

use crate::models::CodingSession;
use crate::sessions::SessionStore;

#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<BTreeMap<i64, CodingSession>>>,
    failing_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// While set, inserts and updates fail and leave the records untouched.
    pub fn fail_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("disk unavailable"));
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    async fn insert(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration: Duration,
    ) -> Result<i64> {
        self.check_writable()?;
        let mut records = self.records.lock().unwrap();
        let id = records.keys().next_back().copied().unwrap_or(0) + 1;
        records.insert(
            id,
            CodingSession {
                id,
                start_time,
                end_time: Some(end_time),
                duration,
            },
        );
        Ok(id)
    }

    async fn read_all(&self) -> Result<Vec<CodingSession>> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn update(
        &self,
        id: i64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration: Duration,
    ) -> Result<()> {
        self.check_writable()?;
        self.records.lock().unwrap().insert(
            id,
            CodingSession {
                id,
                start_time,
                end_time: Some(end_time),
                duration,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.records.lock().unwrap().remove(&id).is_some())
    }
}

/// Every operation fails as if the disk went away.
pub struct FailingStore;

impl SessionStore for FailingStore {
    async fn insert(&self, _: NaiveDateTime, _: NaiveDateTime, _: Duration) -> Result<i64> {
        Err(anyhow!("disk unavailable"))
    }

    async fn read_all(&self) -> Result<Vec<CodingSession>> {
        Err(anyhow!("disk unavailable"))
    }

    async fn update(&self, _: i64, _: NaiveDateTime, _: NaiveDateTime, _: Duration) -> Result<()> {
        Err(anyhow!("disk unavailable"))
    }

    async fn delete(&self, _: i64) -> Result<bool> {
        Err(anyhow!("disk unavailable"))
    }
}
