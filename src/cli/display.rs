use chrono::Duration;

use crate::db::helpers::TimestampFormat;
use crate::models::CodingSession;
use crate::stats::{GoalProjection, Totals};

/// A duration split into whole hours, minutes and seconds. The sign is kept
/// separately so every component reads the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub negative: bool,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Breakdown {
    pub fn of(value: Duration) -> Self {
        let total = value.num_seconds();
        let magnitude = total.unsigned_abs() as i64;
        Self {
            negative: total < 0,
            hours: magnitude / 3600,
            minutes: (magnitude % 3600) / 60,
            seconds: magnitude % 60,
        }
    }

    pub fn words(&self) -> String {
        format!(
            "{} hours, {} minutes, and {} seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// `hh:mm:ss`, with hours allowed past 24 and a leading `-` when negative.
pub fn format_clock(value: Duration) -> String {
    let parts = Breakdown::of(value);
    format!(
        "{}{:02}:{:02}:{:02}",
        if parts.negative { "-" } else { "" },
        parts.hours,
        parts.minutes,
        parts.seconds
    )
}

pub fn session_table(
    sessions: &[CodingSession],
    totals: Option<&Totals>,
    timestamps: &TimestampFormat,
) -> String {
    let rows: Vec<[String; 4]> = sessions
        .iter()
        .map(|session| {
            [
                session.id.to_string(),
                timestamps.format(&session.start_time),
                if session.is_live() {
                    "running".to_string()
                } else {
                    session
                        .end_time
                        .map(|end| timestamps.format(&end))
                        .unwrap_or_default()
                },
                format_clock(session.duration),
            ]
        })
        .collect();

    let header = ["ID", "Start Time", "End Time", "Duration"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: [&str; 4]| {
        format!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        )
        .trim_end()
        .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(line(header));
    if rows.is_empty() {
        out.push("(no sessions recorded)".to_string());
    }
    for row in &rows {
        out.push(line([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
    }

    if let Some(totals) = totals {
        out.push(String::new());
        out.push(format!("Total time coding:   {}", format_clock(totals.total)));
        out.push(format!("Average time coding: {}", format_clock(totals.average)));
    }

    out.join("\n")
}

pub fn goal_summary(projection: &GoalProjection, target_hours: i64, days_remaining: i32) -> String {
    let remaining = Breakdown::of(projection.time_remaining);
    let pace = Breakdown::of(projection.daily_pace);

    let mut out = format!(
        "Based on your goal of {target_hours} hours over {days_remaining} days:\n"
    );
    if projection.is_met() {
        out.push_str(&format!(
            "  You are {} past your goal.\n",
            remaining.words()
        ));
        out.push_str(&format!(
            "  That is {} per remaining day beyond the target.",
            pace.words()
        ));
    } else {
        out.push_str(&format!(
            "  You need {} until you reach your goal.\n",
            remaining.words()
        ));
        out.push_str(&format!(
            "  That means coding {} every day you have left.",
            pace.words()
        ));
    }
    out
}
