//! CLI configuration.

use std::env;
use std::path::PathBuf;

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file.
    pub db_path: PathBuf,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let db_path = env::var("SESSIONCTL_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".sessionctl").join("sessions.db")
            });

        Self {
            db_path,
            log_level: env::var("SESSIONCTL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
