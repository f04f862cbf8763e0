use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use log::{info, warn};
use rusqlite::{params, Row};

use crate::db::{
    helpers::{duration_from_secs, duration_to_secs, parse_stored_datetime, TimestampFormat},
    Database,
};
use crate::models::CodingSession;
use crate::sessions::SessionStore;

fn row_to_session(row: &Row, timestamps: &TimestampFormat) -> Result<CodingSession> {
    let start_datetime: String = row.get("start_datetime")?;
    let end_datetime: String = row.get("end_datetime")?;
    let duration_secs: i64 = row.get("duration_secs")?;

    Ok(CodingSession {
        id: row.get("id")?,
        start_time: parse_stored_datetime(timestamps, &start_datetime, "start_datetime")?,
        end_time: Some(parse_stored_datetime(timestamps, &end_datetime, "end_datetime")?),
        duration: duration_from_secs(duration_secs, "duration_secs")?,
    })
}

impl SessionStore for Database {
    async fn insert(
        &self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration: Duration,
    ) -> Result<i64> {
        let start = self.timestamps().format(&start_time);
        let end = self.timestamps().format(&end_time);
        let id = self
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO coding_sessions (start_datetime, end_datetime, duration_secs)
                     VALUES (?1, ?2, ?3)",
                    params![start, end, duration_to_secs(duration)],
                )
                .with_context(|| "failed to insert coding session")?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        info!("Stored coding session {id}");
        Ok(id)
    }

    async fn read_all(&self) -> Result<Vec<CodingSession>> {
        let timestamps = self.timestamps().clone();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, start_datetime, end_datetime, duration_secs
                 FROM coding_sessions
                 ORDER BY id ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row, &timestamps)?);
            }

            Ok(sessions)
        })
        .await
    }

    async fn update(
        &self,
        id: i64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration: Duration,
    ) -> Result<()> {
        let start = self.timestamps().format(&start_time);
        let end = self.timestamps().format(&end_time);
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO coding_sessions (id, start_datetime, end_datetime, duration_secs)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     start_datetime = excluded.start_datetime,
                     end_datetime = excluded.end_datetime,
                     duration_secs = excluded.duration_secs",
                params![id, start, end, duration_to_secs(duration)],
            )
            .with_context(|| format!("failed to update coding session {id}"))?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let removed = self
            .execute(move |conn| {
                let affected = conn
                    .execute("DELETE FROM coding_sessions WHERE id = ?1", params![id])
                    .with_context(|| format!("failed to delete coding session {id}"))?;
                Ok(affected > 0)
            })
            .await?;

        if !removed {
            warn!("delete: no coding session found for id={id}");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn open(temp_dir: &TempDir) -> Database {
        Database::new(temp_dir.path().join("sessions.sqlite3"), TimestampFormat::default()).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_reads_back_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let db = open(&temp_dir);

        let first = db.insert(at(2, 9), at(2, 11), Duration::hours(2)).await.unwrap();
        let second = db.insert(at(1, 14), at(1, 15), Duration::hours(1)).await.unwrap();
        assert!(second > first);

        let sessions = db.read_all().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, first);
        assert_eq!(sessions[0].start_time, at(2, 9));
        assert_eq!(sessions[0].end_time, Some(at(2, 11)));
        assert_eq!(sessions[0].duration, Duration::hours(2));
        assert_eq!(sessions[1].id, second);
    }

    #[tokio::test]
    async fn update_replaces_in_place_and_upserts_unknown_ids() {
        let temp_dir = TempDir::new().unwrap();
        let db = open(&temp_dir);

        let id = db.insert(at(3, 8), at(3, 9), Duration::hours(1)).await.unwrap();
        db.update(id, at(3, 8), at(3, 12), Duration::hours(4)).await.unwrap();
        db.update(99, at(5, 10), at(5, 11), Duration::hours(1)).await.unwrap();

        let sessions = db.read_all().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, id);
        assert_eq!(sessions[0].end_time, Some(at(3, 12)));
        assert_eq!(sessions[0].duration, Duration::hours(4));
        assert_eq!(sessions[1].id, 99);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let temp_dir = TempDir::new().unwrap();
        let db = open(&temp_dir);

        let keep = db.insert(at(6, 8), at(6, 9), Duration::hours(1)).await.unwrap();
        let doomed = db.insert(at(7, 8), at(7, 9), Duration::hours(1)).await.unwrap();

        assert!(db.delete(doomed).await.unwrap());
        assert!(!db.delete(doomed).await.unwrap());

        let ids: Vec<i64> = db.read_all().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[tokio::test]
    async fn timestamps_are_stored_in_the_configured_format() {
        let temp_dir = TempDir::new().unwrap();
        let db = open(&temp_dir);

        let start = at(9, 13) + Duration::seconds(7);
        let end = at(9, 14);
        db.insert(start, end, end - start).await.unwrap();

        let raw: String = db
            .execute(|conn| {
                Ok(conn.query_row(
                    "SELECT start_datetime FROM coding_sessions LIMIT 1",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(raw, "4/9/2024 1:00:07 PM");
    }

    #[tokio::test]
    async fn records_survive_reopening_the_file() {
        let temp_dir = TempDir::new().unwrap();
        {
            let db = open(&temp_dir);
            db.insert(at(10, 20), at(10, 22), Duration::hours(2)).await.unwrap();
        }

        let reopened = open(&temp_dir);
        let sessions = reopened.read_all().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, at(10, 20));
    }
}
