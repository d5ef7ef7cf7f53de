//! Server configuration.
//!
//! Built by the binary from CLI arguments (with environment fallbacks);
//! tests construct it directly.

use std::{path::PathBuf, time::Duration};

use crate::domain::RaceSettings;

/// How commands that cannot be applied are answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InvalidCommandPolicy {
    /// Drop the command and log it at debug level
    #[default]
    Ignore,
    /// Answer the sender with a `commandRejected` event
    Reject,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for every path that is not an API route
    pub static_dir: PathBuf,
    /// Period of the liveness probe
    pub heartbeat_interval: Duration,
    /// Period of one countdown step
    pub countdown_tick: Duration,
    pub race: RaceSettings,
    pub invalid_command_policy: InvalidCommandPolicy,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
            heartbeat_interval: Duration::from_secs(30),
            countdown_tick: Duration::from_millis(1000),
            race: RaceSettings::default(),
            invalid_command_policy: InvalidCommandPolicy::default(),
        }
    }
}
