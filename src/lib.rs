mod cli;
mod db;
mod error;
mod models;
mod sessions;
mod settings;
mod stats;
mod timer;

#[cfg(test)]
mod test_support;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;

use cli::{handlers, Cli, Command};

pub use db::helpers::{TimestampFormat, DEFAULT_TIMESTAMP_FORMAT};
pub use db::Database;
pub use error::{TrackerError, TrackerResult};
pub use models::CodingSession;
pub use sessions::{QueryResult, SessionQuery, SessionService, SessionStore};
pub use settings::{Settings, SettingsStore};
pub use stats::{
    aggregate, filter_window, project_goal, sort_sessions, GoalProjection, SortPolicy, TimeUnit,
    Totals, Window,
};
pub use timer::{TimerController, TimerEvent, TimerSnapshot, TimerStatus};

pub(crate) struct AppState {
    pub(crate) sessions: Arc<SessionService<Database>>,
    pub(crate) timer: TimerController<Database>,
    pub(crate) timestamps: TimestampFormat,
    pub(crate) settings: SettingsStore,
    pub(crate) database_path: PathBuf,
}

impl AppState {
    fn open(cli: &Cli) -> Result<Self> {
        let settings_path = cli
            .config
            .clone()
            .unwrap_or_else(settings::default_settings_path);
        let settings = SettingsStore::new(settings_path)?;

        let database_path = cli
            .db
            .clone()
            .unwrap_or_else(|| settings.settings().database_path());
        let timestamps = settings.settings().timestamp_format.clone();
        let database = Database::new(database_path.clone(), timestamps.clone())?;

        let sessions = Arc::new(SessionService::new(database));
        let timer = TimerController::new(sessions.clone(), settings.settings().tick_interval());

        Ok(Self {
            sessions,
            timer,
            timestamps,
            settings,
            database_path,
        })
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level when set.
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    log::debug!("codetrack starting up...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let state = AppState::open(&cli)?;
        match cli.command {
            Command::Start => handlers::start(&state).await,
            Command::Add { start, end } => handlers::add(&state, &start, &end).await,
            Command::List { unit, count, sort } => {
                handlers::list(&state, &unit, count, &sort).await
            }
            Command::Update { id, start, end } => {
                handlers::update(&state, id, &start, &end).await
            }
            Command::Delete { id } => handlers::delete(&state, id).await,
            Command::Goal { hours, days } => handlers::goal(&state, hours, days).await,
            Command::Config { init } => handlers::config(&state, init),
        }
    })
}
