use std::{sync::Arc, time::Duration as StdDuration};

use chrono::{Duration, Local, NaiveDateTime};
use log::{error, info, warn};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use crate::error::{TrackerError, TrackerResult};
use crate::models::CodingSession;
use crate::sessions::{SessionService, SessionStore};

use super::{TimerState, TimerStatus};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Started {
        started_at: NaiveDateTime,
    },
    Tick {
        started_at: NaiveDateTime,
        elapsed: Duration,
    },
    Stopped {
        session: CodingSession,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub started_at: Option<NaiveDateTime>,
    pub elapsed: Duration,
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

/// Owns the live session: starts it, ticks it, and hands the finished
/// record to the session service. Presentation listens through
/// [`TimerController::subscribe`].
pub struct TimerController<S> {
    state: Arc<Mutex<TimerState>>,
    sessions: Arc<SessionService<S>>,
    ticker: Mutex<Option<Ticker>>,
    tick_interval: StdDuration,
    events: broadcast::Sender<TimerEvent>,
}

impl<S: SessionStore> TimerController<S> {
    pub fn new(sessions: Arc<SessionService<S>>, tick_interval: StdDuration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(TimerState::new())),
            sessions,
            ticker: Mutex::new(None),
            tick_interval,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        let mut guard = self.state.lock().await;
        let elapsed = guard.sync_elapsed(Local::now().naive_local());
        TimerSnapshot {
            status: guard.status,
            started_at: guard.started_at(),
            elapsed,
        }
    }

    pub async fn start(&self) -> TrackerResult<TimerSnapshot> {
        self.start_at(Local::now().naive_local()).await
    }

    pub async fn start_at(&self, now: NaiveDateTime) -> TrackerResult<TimerSnapshot> {
        let started_at = {
            let mut state = self.state.lock().await;
            state.begin(now)?;
            state.started_at().unwrap_or(now)
        };

        let _ = self.events.send(TimerEvent::Started { started_at });
        self.spawn_ticker().await;
        info!("Live coding session started at {started_at}");

        Ok(self.snapshot().await)
    }

    pub async fn stop(&self) -> TrackerResult<CodingSession> {
        self.stop_at(Local::now().naive_local()).await
    }

    /// Finalizes the live session and stores it. A session with an invalid
    /// interval is discarded. When the write fails the finished record stays
    /// in memory with status `Stopped`, and the next call retries it.
    pub async fn stop_at(&self, now: NaiveDateTime) -> TrackerResult<CodingSession> {
        self.cancel_ticker().await;

        // Held across the write so two stops cannot store the record twice.
        let mut state = self.state.lock().await;
        let session = match state.unsaved().cloned() {
            Some(pending) => {
                info!(
                    "Retrying store of session started at {}",
                    pending.start_time
                );
                pending
            }
            None if state.status == TimerStatus::Running => match state.finish(now) {
                Ok(session) => session,
                Err(err) => {
                    state.reset();
                    warn!("Discarding live session: {err}");
                    return Err(err);
                }
            },
            None => return Err(TrackerError::NoActiveSession),
        };

        let stored = match self.sessions.save(session).await {
            Ok(stored) => stored,
            Err(err) => {
                error!("Failed to store finished session, keeping it for retry: {err}");
                return Err(err);
            }
        };
        state.reset();
        drop(state);

        info!(
            "Live coding session {} stopped after {}s",
            stored.id,
            stored.duration.num_seconds()
        );
        let _ = self.events.send(TimerEvent::Stopped {
            session: stored.clone(),
        });

        Ok(stored)
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel_token.cancel();
            previous.handle.abort();
        }

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let state = self.state.clone();
        let events = self.events.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let (started_at, elapsed) = {
                    let mut guard = state.lock().await;
                    if guard.status != TimerStatus::Running {
                        break;
                    }
                    let elapsed = guard.sync_elapsed(Local::now().naive_local());
                    match guard.started_at() {
                        Some(started_at) => (started_at, elapsed),
                        None => break,
                    }
                };

                // No subscribers is fine; the tick is simply dropped.
                let _ = events.send(TimerEvent::Tick { started_at, elapsed });
            }
        });

        *ticker_guard = Some(Ticker {
            handle,
            cancel_token,
        });
    }

    async fn cancel_ticker(&self) {
        let Some(ticker) = self.ticker.lock().await.take() else {
            return;
        };

        ticker.cancel_token.cancel();
        if let Err(err) = ticker.handle.await {
            error!("Timer ticker task failed to join: {err}");
        }
    }
}
