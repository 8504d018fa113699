//! Runtime configuration resolved from flags, environment and defaults.

use anyhow::{Context, Result};
use clap::Args;
use messbook_core::{default_log_level, WeekStart};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "messbook";
const DB_FILE_NAME: &str = "messbook.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Global options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// SQLite database holding the ledger
    #[arg(long, global = true, env = "MESSBOOK_DB")]
    pub db: Option<PathBuf>,

    /// Keep state in memory only; nothing is written to disk. Takes
    /// precedence over `--db` and `MESSBOOK_DB`.
    #[arg(long, global = true)]
    pub memory: bool,

    /// Directory for rolling log files (absolute path)
    #[arg(long, global = true, env = "MESSBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "MESSBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// First day of the calendar week: sunday|monday
    #[arg(long, global = true, env = "MESSBOOK_WEEK_START", default_value = "sunday")]
    pub week_start: WeekStart,
}

/// Where the ledger lives for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: Storage,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub week_start: WeekStart,
}

impl Config {
    pub fn resolve(opts: &GlobalOpts) -> Result<Self> {
        let storage = if opts.memory {
            Storage::Memory
        } else {
            match &opts.db {
                Some(path) => Storage::File(path.clone()),
                None => Storage::File(app_dir()?.join(DB_FILE_NAME)),
            }
        };

        let log_dir = match &opts.log_dir {
            Some(dir) => dir.clone(),
            None => app_dir()?.join(LOG_DIR_NAME),
        };

        Ok(Self {
            storage,
            log_dir,
            log_level: opts
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            week_start: opts.week_start,
        })
    }
}

fn app_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("Could not determine local data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::{Config, GlobalOpts, Storage};
    use clap::Parser;
    use messbook_core::WeekStart;
    use std::path::PathBuf;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalOpts,
    }

    fn opts(db: Option<&str>, memory: bool) -> GlobalOpts {
        GlobalOpts {
            db: db.map(PathBuf::from),
            memory,
            log_dir: Some(PathBuf::from("/var/log/messbook")),
            log_level: Some("debug".to_string()),
            week_start: WeekStart::Sunday,
        }
    }

    #[test]
    fn memory_wins_over_configured_db() {
        let config = Config::resolve(&opts(Some("/data/mess.sqlite3"), true)).unwrap();
        assert_eq!(config.storage, Storage::Memory);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/messbook"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn explicit_db_is_used_without_memory() {
        let config = Config::resolve(&opts(Some("/data/mess.sqlite3"), false)).unwrap();
        assert_eq!(
            config.storage,
            Storage::File(PathBuf::from("/data/mess.sqlite3"))
        );
    }

    #[test]
    fn memory_and_db_flags_parse_together() {
        let cli = TestCli::try_parse_from([
            "messbook",
            "--memory",
            "--db",
            "/data/mess.sqlite3",
            "--week-start",
            "monday",
        ])
        .unwrap();
        assert!(cli.global.memory);
        assert_eq!(cli.global.week_start, WeekStart::Monday);
        let config = Config::resolve(&cli.global).unwrap();
        assert_eq!(config.storage, Storage::Memory);
    }
}
