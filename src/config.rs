use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::schedule::{Schedule, ScheduleError};

/// Process configuration, read from `KARTAVAIL_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub fleet_path: PathBuf,
    pub max_connections: usize,
    pub metrics_port: Option<u16>,
    pub schedule: Schedule,
    /// `None` disables polling the fleet file.
    pub reload_every: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup("KARTAVAIL_BIND").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "KARTAVAIL_PORT", 7878)?;
        let fleet_path = lookup("KARTAVAIL_FLEET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./fleet.json"));
        let max_connections = parse_or(&lookup, "KARTAVAIL_MAX_CONNECTIONS", 256)?;
        let metrics_port = parse_opt(&lookup, "KARTAVAIL_METRICS_PORT")?;

        let open_hour = parse_or(&lookup, "KARTAVAIL_OPEN_HOUR", 9)?;
        let close_hour = parse_or(&lookup, "KARTAVAIL_CLOSE_HOUR", 22)?;
        let slot_minutes = parse_or(&lookup, "KARTAVAIL_SLOT_MINUTES", 60)?;
        let utc_offset_minutes = parse_or(&lookup, "KARTAVAIL_UTC_OFFSET_MINUTES", 0)?;
        let schedule = Schedule::new(open_hour, close_hour, slot_minutes, utc_offset_minutes)
            .map_err(ConfigError::Schedule)?;

        let reload_secs: u64 = parse_or(&lookup, "KARTAVAIL_RELOAD_SECS", 30)?;
        let reload_every = (reload_secs > 0).then(|| Duration::from_secs(reload_secs));

        Ok(Self {
            bind,
            port,
            fleet_path,
            max_connections,
            metrics_port,
            schedule,
            reload_every,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse_opt<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    Ok(parse_opt(lookup, var)?.unwrap_or(default))
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Invalid { var: &'static str, value: String },
    Schedule(ScheduleError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { var, value } => write!(f, "invalid value for {var}: {value:?}"),
            ConfigError::Schedule(e) => write!(f, "invalid schedule: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
