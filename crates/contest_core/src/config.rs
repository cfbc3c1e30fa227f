//! Store configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults,
//! 2. optional config file named by `CONTEST_CONFIG` (default `config/contest`,
//!    any format the `config` crate understands),
//! 3. `CONTEST__*` environment variables, e.g. `CONTEST__DATABASE_PATH`.

use crate::db::{open_db, open_db_in_memory, DbResult};
use config::{Config, ConfigError, Environment, File};
use rusqlite::Connection;
use serde::Deserialize;

/// Value of `database_path` selecting a throwaway in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

const DEFAULT_CONFIG_PATH: &str = "config/contest";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file path, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Absolute directory for rolling log files; file logging is off when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_database_path() -> String {
    "contest.sqlite3".into()
}
fn default_log_level() -> String {
    crate::logging::default_log_level().into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from the default file location and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONTEST_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path` (optional) and environment.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("database_path", default_database_path())?
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("CONTEST").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }

    /// Opens the configured store with migrations applied.
    pub fn open(&self) -> DbResult<Connection> {
        if self.is_in_memory() {
            open_db_in_memory()
        } else {
            open_db(&self.database_path)
        }
    }
}
