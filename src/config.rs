//! Process configuration from environment variables

use crate::dispatcher::DispatchConfig;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Path value that keeps the log in memory only
pub const MEMORY_DB_PATH: &str = ":memory:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub port: u16,
    /// Static credential tier
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Base URL override for the remote model endpoint
    pub gateway: Option<String>,
    pub llm_timeout: Duration,
    pub dispatch: DispatchConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path = var("SUSANA_DB_PATH").unwrap_or_else(|| {
            let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
            format!("{home}/.susana/susana.db")
        });

        let port = parse_or("SUSANA_PORT", var("SUSANA_PORT"), DEFAULT_PORT, "port")?;
        let timeout_secs = parse_or(
            "SUSANA_LLM_TIMEOUT_SECS",
            var("SUSANA_LLM_TIMEOUT_SECS"),
            DEFAULT_LLM_TIMEOUT_SECS,
            "positive number of seconds",
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SUSANA_LLM_TIMEOUT_SECS",
                value: var("SUSANA_LLM_TIMEOUT_SECS").unwrap_or_default(),
                expected: "positive number of seconds",
            });
        }
        let delay_ms = parse_or(
            "SUSANA_DEMO_DELAY_MS",
            var("SUSANA_DEMO_DELAY_MS"),
            0u64,
            "number of milliseconds",
        )?;
        let disclose_demo = match var("SUSANA_DISCLOSE_DEMO") {
            None => true,
            Some(value) => parse_bool("SUSANA_DISCLOSE_DEMO", &value)?,
        };

        Ok(Self {
            db_path,
            port,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gateway: var("LLM_GATEWAY"),
            llm_timeout: Duration::from_secs(timeout_secs),
            dispatch: DispatchConfig {
                disclose_demo,
                demo_delay: Duration::from_millis(delay_ms),
            },
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == MEMORY_DB_PATH
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: name,
            value: raw,
            expected,
        }),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: name,
            value: raw.to_string(),
            expected: "boolean",
        }),
    }
}
