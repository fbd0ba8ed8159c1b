//! Runtime configuration, read from the environment (and `.env` when present).

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

// --- Environment variables ---
pub const ENV_API_URL: &str = "CLASSIFIER_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CLASSIFIER_TIMEOUT_SECS";
pub const ENV_SIMULATE_LATENCY: &str = "CLASSIFIER_SIMULATE_LATENCY";
pub const ENV_LATENCY_MIN_MS: &str = "CLASSIFIER_LATENCY_MIN_MS";
pub const ENV_LATENCY_MAX_MS: &str = "CLASSIFIER_LATENCY_MAX_MS";
pub const ENV_RNG_SEED: &str = "CLASSIFIER_RNG_SEED";
pub const ENV_LOG_FORMAT: &str = "CLASSIFIER_LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "CLASSIFIER_LOG_LEVEL";

// --- Defaults ---
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LATENCY_MIN_MS: u64 = 1500;
const DEFAULT_LATENCY_MAX_MS: u64 = 2500;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// Bunyan-style JSON records.
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Settings of the classification engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClassifierConfig {
    /// Base URL of the classification service. `None` disables the remote path.
    #[validate(url)]
    pub api_url: Option<String>,
    #[validate(range(min = 1, max = 120))]
    pub timeout_secs: u64,
    pub simulate_latency: bool,
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,
    /// Pins jitter, template choice and simulated delays.
    pub rng_seed: Option<u64>,
    pub log_format: LogFormat,
    #[validate(length(min = 1))]
    pub log_level: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            simulate_latency: true,
            latency_min_ms: DEFAULT_LATENCY_MIN_MS,
            latency_max_ms: DEFAULT_LATENCY_MAX_MS,
            rng_seed: None,
            log_format: LogFormat::Pretty,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Loads `.env` if there is one, then reads and checks the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self::read_env()?;
        config.check()?;
        Ok(config)
    }

    /// Like [`from_env`](Self::from_env) but leaves [`check`](Self::check) to the
    /// caller, so overrides can replace bad values first. Unparseable values
    /// still fail here.
    pub fn read_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok(); // A missing .env file is fine
        Self::read_process_env()
    }

    /// Reads and checks the process environment only.
    pub fn from_process_env() -> Result<Self, AppError> {
        let config = Self::read_process_env()?;
        config.check()?;
        Ok(config)
    }

    /// Reads the process environment without checking it. Unset or blank
    /// variables take their default.
    pub fn read_process_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            api_url: env_value(ENV_API_URL),
            timeout_secs: parse_env(ENV_TIMEOUT_SECS, defaults.timeout_secs)?,
            simulate_latency: parse_bool_env(ENV_SIMULATE_LATENCY, defaults.simulate_latency)?,
            latency_min_ms: parse_env(ENV_LATENCY_MIN_MS, defaults.latency_min_ms)?,
            latency_max_ms: parse_env(ENV_LATENCY_MAX_MS, defaults.latency_max_ms)?,
            rng_seed: env_value(ENV_RNG_SEED)
                .map(|raw| parse_value(ENV_RNG_SEED, &raw))
                .transpose()?,
            log_format: parse_env(ENV_LOG_FORMAT, defaults.log_format)?,
            log_level: env_value(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        };

        Ok(config)
    }

    /// Field validation plus the rules spanning several fields.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        if self.latency_min_ms > self.latency_max_ms {
            return Err(AppError::Config(format!(
                "{} ({}) must not exceed {} ({})",
                ENV_LATENCY_MIN_MS, self.latency_min_ms, ENV_LATENCY_MAX_MS, self.latency_max_ms
            )));
        }
        Ok(())
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Bounds of the simulated delay, or `None` when simulation is off.
    pub fn latency_range(&self) -> Option<(Duration, Duration)> {
        self.simulate_latency.then(|| {
            (
                Duration::from_millis(self.latency_min_ms),
                Duration::from_millis(self.latency_max_ms),
            )
        })
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|e| AppError::Config(format!("Invalid value for {}: {:?} ({})", name, raw, e)))
}

fn parse_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match env_value(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_bool_env(name: &str, default: bool) -> Result<bool, AppError> {
    let Some(raw) = env_value(name) else {
        return Ok(default);
    };
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "Invalid value for {}: {:?} (expected true or false)",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ClassifierConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.remote_timeout(), Duration::from_secs(15));
        assert_eq!(
            config.latency_range(),
            Some((Duration::from_millis(1500), Duration::from_millis(2500)))
        );
    }

    #[test]
    fn test_latency_range_disabled() {
        let config = ClassifierConfig {
            simulate_latency: false,
            ..Default::default()
        };
        assert_eq!(config.latency_range(), None);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
