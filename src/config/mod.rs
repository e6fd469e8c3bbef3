//! Configuration handling for a scrape run.
//!
//! Everything the collaborators need (reader credential, reader endpoint,
//! output directory, fetch limits) is read once here and passed down
//! explicitly. `Config::from_env` loads the values with development defaults.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable names. Public so tests and the CLI can refer to them.
pub const ENV_READER_API_KEY: &str = "JINA_API_KEY";
pub const ENV_READER_BASE_URL: &str = "READER_BASE_URL";
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_FETCH_ATTEMPTS: &str = "FETCH_ATTEMPTS";
pub const ENV_SCRAPE_CONCURRENCY: &str = "SCRAPE_CONCURRENCY";

/// Default values used when environment variables are absent.
const DEFAULT_READER_BASE_URL: &str = "https://r.jina.ai";
const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;
const DEFAULT_FETCH_ATTEMPTS: u32 = 2;
const DEFAULT_SCRAPE_CONCURRENCY: usize = 1;

/// Settings for the reader proxy client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub attempts: u32,
}

impl ReaderConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            attempts: DEFAULT_FETCH_ATTEMPTS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Runtime configuration for a scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    reader: ReaderConfig,
    output_dir: PathBuf,
    concurrency: usize,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(reader: ReaderConfig, output_dir: impl Into<PathBuf>, concurrency: usize) -> Self {
        Self {
            reader,
            output_dir: output_dir.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(ENV_READER_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_READER_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_READER_BASE_URL,
            reason: e.to_string(),
        })?;

        let api_key = env::var(ENV_READER_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty());

        let timeout_secs = parse_var(ENV_FETCH_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS)?;
        let attempts = parse_var(ENV_FETCH_ATTEMPTS, DEFAULT_FETCH_ATTEMPTS)?;
        if attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_FETCH_ATTEMPTS,
                reason: "must be at least 1".to_string(),
            });
        }

        let concurrency = parse_var(ENV_SCRAPE_CONCURRENCY, DEFAULT_SCRAPE_CONCURRENCY)?;
        let output_dir =
            env::var(ENV_OUTPUT_DIR).unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string());

        let mut reader = ReaderConfig::new(base_url)
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_attempts(attempts);
        reader.api_key = api_key;

        Ok(Self::new(reader, output_dir, concurrency))
    }

    pub fn reader(&self) -> &ReaderConfig {
        &self.reader
    }

    /// Directory the per-site CSV files are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Maximum number of sites processed at the same time.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field: name,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
