use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;
use crate::models::CodingSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    /// Store order, which is id order.
    #[default]
    None,
    Newest,
    Oldest,
    Shortest,
    Longest,
}

impl SortPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortPolicy::None => "none",
            SortPolicy::Newest => "newest",
            SortPolicy::Oldest => "oldest",
            SortPolicy::Shortest => "shortest",
            SortPolicy::Longest => "longest",
        }
    }
}

impl FromStr for SortPolicy {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "no" | "none" => Ok(SortPolicy::None),
            "newest" => Ok(SortPolicy::Newest),
            "oldest" => Ok(SortPolicy::Oldest),
            "shortest" => Ok(SortPolicy::Shortest),
            "longest" => Ok(SortPolicy::Longest),
            other => Err(TrackerError::invalid(format!(
                "unknown sort policy '{other}' (expected newest, oldest, shortest, longest or none)"
            ))),
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable in-place sort; sessions with equal keys keep their relative order.
pub fn sort_sessions(sessions: &mut [CodingSession], policy: SortPolicy) {
    match policy {
        SortPolicy::None => {}
        SortPolicy::Newest => sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time)),
        SortPolicy::Oldest => sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time)),
        SortPolicy::Shortest => sessions.sort_by(|a, b| a.duration.cmp(&b.duration)),
        SortPolicy::Longest => sessions.sort_by(|a, b| b.duration.cmp(&a.duration)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn session(id: i64, start_day: u32, minutes: i64) -> CodingSession {
        let start = day(start_day);
        CodingSession::finalized(start, start + Duration::minutes(minutes))
            .unwrap()
            .with_id(id)
    }

    fn ids(sessions: &[CodingSession]) -> Vec<i64> {
        sessions.iter().map(|s| s.id).collect()
    }

    fn fixture() -> Vec<CodingSession> {
        vec![
            session(1, 4, 60),
            session(2, 1, 15),
            session(3, 9, 120),
            session(4, 6, 45),
        ]
    }

    #[test]
    fn newest_is_oldest_reversed() {
        let mut newest = fixture();
        let mut oldest = fixture();
        sort_sessions(&mut newest, SortPolicy::Newest);
        sort_sessions(&mut oldest, SortPolicy::Oldest);

        assert_eq!(ids(&newest), vec![3, 4, 1, 2]);
        oldest.reverse();
        assert_eq!(newest, oldest);
    }

    #[test]
    fn duration_policies_order_by_length() {
        let mut shortest = fixture();
        sort_sessions(&mut shortest, SortPolicy::Shortest);
        assert_eq!(ids(&shortest), vec![2, 4, 1, 3]);

        let mut longest = fixture();
        sort_sessions(&mut longest, SortPolicy::Longest);
        assert_eq!(ids(&longest), vec![3, 1, 4, 2]);
    }

    #[test]
    fn equal_durations_keep_store_order() {
        let base = vec![
            session(1, 3, 30),
            session(2, 1, 90),
            session(3, 2, 30),
            session(4, 5, 30),
        ];

        let mut shortest = base.clone();
        sort_sessions(&mut shortest, SortPolicy::Shortest);
        assert_eq!(ids(&shortest), vec![1, 3, 4, 2]);

        let mut longest = base;
        sort_sessions(&mut longest, SortPolicy::Longest);
        assert_eq!(ids(&longest), vec![2, 1, 3, 4]);
    }

    #[test]
    fn none_preserves_input() {
        let mut sessions = fixture();
        sort_sessions(&mut sessions, SortPolicy::None);
        assert_eq!(ids(&sessions), vec![1, 2, 3, 4]);
    }

    #[test]
    fn parsing_is_a_closed_set() {
        assert_eq!("no".parse::<SortPolicy>().unwrap(), SortPolicy::None);
        assert_eq!("".parse::<SortPolicy>().unwrap(), SortPolicy::None);
        assert_eq!("LONGEST".parse::<SortPolicy>().unwrap(), SortPolicy::Longest);
        assert!(matches!(
            "alphabetical".parse::<SortPolicy>(),
            Err(TrackerError::InvalidArgument(_))
        ));
    }
}
