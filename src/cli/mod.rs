pub mod display;
pub mod handlers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "codetrack")]
#[command(about = "Track coding sessions and progress toward coding goals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the settings file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[arg(long, default_value = "info", global = true)]
    pub log_level: log::LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a live session; type `stop` to end it
    Start,

    /// Record a past session by hand
    Add {
        /// Start time, e.g. "3/7/2024 1:05:00 PM"
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// List past sessions with total and average time
    List {
        /// days, weeks, months, years or none
        #[arg(long, default_value = "none")]
        unit: String,

        /// How many units back to look
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// newest, oldest, shortest, longest or none
        #[arg(long, default_value = "none")]
        sort: String,
    },

    /// Replace the times of an existing session
    Update {
        id: i64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Delete a session
    Delete { id: i64 },

    /// Hours left and daily pace needed to reach a coding goal
    Goal {
        /// Goal in hours of total coding time
        #[arg(long)]
        hours: i64,

        /// Days left to reach the goal
        #[arg(long)]
        days: i32,
    },

    /// Show the effective settings
    Config {
        /// Write the settings file if it does not exist yet
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults_to_everything_unsorted() {
        let cli = Cli::try_parse_from(["codetrack", "list"]).unwrap();
        match cli.command {
            Command::List { unit, count, sort } => {
                assert_eq!(unit, "none");
                assert_eq!(count, 1);
                assert_eq!(sort, "none");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "codetrack",
            "goal",
            "--hours",
            "20",
            "--days",
            "5",
            "--db",
            "/tmp/x.sqlite3",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.sqlite3")));
        assert_eq!(cli.log_level, log::LevelFilter::Debug);
        assert!(matches!(cli.command, Command::Goal { hours: 20, days: 5 }));
    }

    #[test]
    fn update_takes_positional_id() {
        let cli = Cli::try_parse_from([
            "codetrack",
            "update",
            "4",
            "--start",
            "1/2/2024 9:00:00 AM",
            "--end",
            "1/2/2024 10:00:00 AM",
        ])
        .unwrap();
        match cli.command {
            Command::Update { id, start, end } => {
                assert_eq!(id, 4);
                assert_eq!(start, "1/2/2024 9:00:00 AM");
                assert_eq!(end, "1/2/2024 10:00:00 AM");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
