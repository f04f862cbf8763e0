use std::io::{self, Write};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::broadcast::error::RecvError,
};

use crate::sessions::SessionQuery;
use crate::timer::{TimerEvent, TimerStatus};
use crate::AppState;

use super::display::{format_clock, goal_summary, session_table};

pub async fn start(state: &AppState) -> Result<()> {
    run_live_session(state, tokio::io::stdin()).await
}

/// Runs a live session until `input` yields a line starting with `s` or
/// ends. The session is stopped on every exit path, including read errors.
async fn run_live_session<R>(state: &AppState, input: R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut events = state.timer.subscribe();
    let snapshot = state.timer.start().await?;
    if let Some(started_at) = snapshot.started_at {
        println!(
            "You started a new coding session at {}.",
            state.timestamps.format(&started_at).yellow()
        );
    }
    println!("Enter {} to stop the session.\n", "stop".bold().cyan());

    let mut lines = BufReader::new(input).lines();
    let input_result: io::Result<()> = loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(TimerEvent::Tick { elapsed, .. }) => {
                    print!("\rTime elapsed since you began: {}", format_clock(elapsed));
                    let _ = io::stdout().flush();
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break Ok(()),
            },
            line = lines.next_line() => match line {
                Ok(Some(text)) if is_stop_command(&text) => break Ok(()),
                Ok(Some(_)) => {}
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            },
        }
    };

    let session = match state.timer.stop().await {
        Ok(session) => session,
        Err(err) => {
            report_unsaved(state).await;
            return Err(err.into());
        }
    };
    println!("\n\nSession stopped.");
    println!(
        "  Start time: {}",
        state.timestamps.format(&session.start_time).yellow()
    );
    if let Some(end_time) = session.end_time {
        println!("  End time:   {}", state.timestamps.format(&end_time).yellow());
    }
    println!("  Coded for:  {}", format_clock(session.duration).yellow());

    input_result.context("failed to read from stdin")
}

fn is_stop_command(line: &str) -> bool {
    line.trim().to_ascii_lowercase().starts_with('s')
}

/// Prints the manual entry for a session the store refused.
async fn report_unsaved(state: &AppState) {
    let snapshot = state.timer.snapshot().await;
    if let (TimerStatus::Stopped, Some(started_at)) = (snapshot.status, snapshot.started_at) {
        eprintln!("\nThe session could not be saved. Record it later with:");
        eprintln!(
            "  codetrack add \"{}\" \"{}\"",
            state.timestamps.format(&started_at),
            state.timestamps.format(&(started_at + snapshot.elapsed))
        );
    }
}

pub async fn add(state: &AppState, start: &str, end: &str) -> Result<()> {
    let start_time = state.timestamps.parse(start)?;
    let end_time = state.timestamps.parse(end)?;

    let session = state.sessions.record(start_time, end_time).await?;
    println!(
        "Recorded session {} lasting {}.",
        session.id.bold(),
        format_clock(session.duration).yellow()
    );
    Ok(())
}

pub async fn list(state: &AppState, unit: &str, count: u32, sort: &str) -> Result<()> {
    let query = SessionQuery::parse(unit, count, sort)?;
    let result = state.sessions.query(query).await?;

    println!("{}", "Past Sessions Recorded".bold().yellow());
    println!(
        "{}",
        session_table(&result.sessions, Some(&result.totals), &state.timestamps)
    );
    Ok(())
}

pub async fn update(state: &AppState, id: i64, start: &str, end: &str) -> Result<()> {
    let start_time = state.timestamps.parse(start)?;
    let end_time = state.timestamps.parse(end)?;

    let session = state.sessions.update(id, start_time, end_time).await?;
    println!(
        "Session {} now runs from {} to {}.",
        session.id.bold(),
        state.timestamps.format(&session.start_time).yellow(),
        state.timestamps.format(&end_time).yellow()
    );
    Ok(())
}

pub async fn delete(state: &AppState, id: i64) -> Result<()> {
    if state.sessions.delete(id).await? {
        println!("Deleted session {}.", id.bold());
    } else {
        println!("No session with id {} was found.", id.bold());
    }
    Ok(())
}

pub async fn goal(state: &AppState, hours: i64, days: i32) -> Result<()> {
    let projection = state.sessions.goal(hours, days).await?;
    println!("{}", goal_summary(&projection, hours, days));
    Ok(())
}

pub fn config(state: &AppState, init: bool) -> Result<()> {
    if init && !state.settings.path().exists() {
        state.settings.persist()?;
        println!("Wrote {}", state.settings.path().display());
    }

    println!("Settings file: {}", state.settings.path().display());
    println!("Database:      {}", state.database_path.display());
    println!(
        "{}",
        serde_json::to_string_pretty(state.settings.settings())?
    );
    Ok(())
}
