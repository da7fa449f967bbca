use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::HeaderMap;
use thiserror::Error;
use tokio::fs;

use crate::agent::Agent;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Timeout must be an integer or a float!")]
    InvalidTimeout(String),

    #[error("Unknown agent '{0}'. Valid agents are: chrome, firefox, safari")]
    UnknownAgent(String),

    #[error("Invalid log level: {0}. Valid levels are: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Per-request time limit in seconds, kept in the form it was given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timeout {
    Whole(u64),
    Fractional(f64),
}

impl Timeout {
    pub fn as_duration(&self) -> Duration {
        match *self {
            Timeout::Whole(secs) => Duration::from_secs(secs),
            // validated on parse
            Timeout::Fractional(secs) => Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX),
        }
    }
}

impl FromStr for Timeout {
    type Err = ConfigError;

    /// A value containing `.` is fractional, anything else must be a whole
    /// number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidTimeout(s.to_string());
        let trimmed = s.trim();
        if trimmed.contains('.') {
            let secs: f64 = trimmed.parse().map_err(|_| invalid())?;
            Duration::try_from_secs_f64(secs).map_err(|_| invalid())?;
            Ok(Timeout::Fractional(secs))
        } else {
            trimmed.parse().map(Timeout::Whole).map_err(|_| invalid())
        }
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeout::Whole(secs) => write!(f, "{}s", secs),
            Timeout::Fractional(secs) => write!(f, "{}s", secs),
        }
    }
}

/// Settings shared read-only by every probe in a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeConfig {
    pub timeout: Option<Timeout>,
    pub agent: Option<Agent>,
}

impl ProbeConfig {
    pub fn new(timeout: Option<Timeout>, agent: Option<Agent>) -> Self {
        Self { timeout, agent }
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(|t| t.as_duration())
    }

    /// Identity headers for the configured agent; empty without one.
    pub fn headers(&self) -> HeaderMap {
        self.agent.map(|agent| agent.headers()).unwrap_or_default()
    }
}

/// Get the log level as a tracing::Level
pub fn parse_log_level(level: &str) -> Result<tracing::Level, ConfigError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" | "warning" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string())),
    }
}

/// Read one domain per line, trimming whitespace and skipping blank lines.
pub async fn load_domains(file_path: &Path) -> Result<Vec<String>> {
    if !file_path.exists() {
        return Err(anyhow::anyhow!("Domain file not found: {}", file_path.display()));
    }

    let content = fs::read_to_string(file_path).await?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
