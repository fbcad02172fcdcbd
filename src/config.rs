//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::{
    cooking::CookTimeTable,
    error::StoreResult,
    services::Permission,
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "steak-sync")]
#[command(about = "Grill several steaks to different doneness so they all finish together")]
#[command(version)]
pub struct Config {
    /// Port to bind the control API to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory for the session snapshot, saved steaks and preferences
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// JSON cook-time table to use instead of the built-in one
    #[arg(long)]
    pub cook_times: Option<PathBuf>,

    /// Refuse notification permission, so cook sessions cannot start
    #[arg(long)]
    pub deny_notifications: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Data directory, defaulting to the platform data dir
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("steak-sync")
        })
    }

    pub fn notification_permission(&self) -> Permission {
        if self.deny_notifications {
            Permission::Denied
        } else {
            Permission::Granted
        }
    }

    /// The cook-time table from `--cook-times`, or the built-in one
    pub fn cook_time_table(&self) -> StoreResult<CookTimeTable> {
        match &self.cook_times {
            Some(path) => CookTimeTable::load(path),
            None => Ok(CookTimeTable::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["steak-sync"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.notification_permission(), Permission::Granted);
        assert!(config.data_dir().ends_with("steak-sync"));
        assert_eq!(config.cook_time_table().unwrap().len(), 20);
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from([
            "steak-sync",
            "--port",
            "9000",
            "--data-dir",
            "/tmp/grill",
            "--deny-notifications",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/grill"));
        assert_eq!(config.notification_permission(), Permission::Denied);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn missing_cook_time_file_is_an_error() {
        let config = Config::try_parse_from(["steak-sync", "--cook-times", "/nonexistent/table.json"]).unwrap();
        assert!(config.cook_time_table().is_err());
    }
}
