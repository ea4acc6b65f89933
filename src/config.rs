//! Configuration management for build-triage.
//!
//! Configuration is read from environment variables (a `.env` file in the
//! working directory is loaded first, if present):
//! - `GEMINI_API_KEY` - Required. Falls back to `GOOGLE_API_KEY`.
//! - `DEFAULT_MODEL` - Optional. Defaults to `gemini-2.5-flash`.
//! - `GEMINI_BASE_URL` - Optional. OpenAI-compatible endpoint base.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `20`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Model request timeout. Defaults to `120`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `BUILD_LOG_FETCH` - Optional. Fetch remote logs over HTTP instead of
//!   returning the placeholder log. Defaults to `false`.
//! - `MAX_LOG_BYTES` - Optional. Bytes kept from the tail of a fetched log
//!   (the whole body is still downloaded). Defaults to `200000`.
//! - `MODIFIER_LOOKUP` - Optional. `stub` (default) or `git`.
//! - `GIT_REPO_PATH` - Optional. Repository for `git` lookups. Defaults to current directory.
//! - `EMAIL_SENDER` - Optional. From address for notifications.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_EMAIL_SENDER: &str = "build-bot@company.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// How `read_build_log` treats URL sources.
#[derive(Debug, Clone)]
pub struct LogSourceConfig {
    /// Perform a real HTTP fetch instead of returning the placeholder log
    pub fetch_remote: bool,

    /// Maximum number of bytes kept from a fetched log
    pub max_log_bytes: usize,

    /// Timeout for the log fetch
    pub fetch_timeout_secs: u64,
}

impl Default for LogSourceConfig {
    fn default() -> Self {
        Self {
            fetch_remote: false,
            max_log_bytes: 200_000,
            fetch_timeout_secs: 30,
        }
    }
}

/// Where `find_last_modifier` gets its answer from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModifierLookup {
    /// Fixed path-substring table
    #[default]
    Stub,
    /// `git log` in the given repository
    Git { repo: PathBuf },
}

impl ModifierLookup {
    fn parse(value: &str, repo: PathBuf) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "stub" | "" => Ok(Self::Stub),
            "git" => Ok(Self::Git { repo }),
            other => Err(ConfigError::InvalidValue(
                "MODIFIER_LOOKUP".to_string(),
                format!("expected 'stub' or 'git', got: {}", other),
            )),
        }
    }
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key: String,

    /// Model identifier
    pub default_model: String,

    /// Base URL of the OpenAI-compatible chat completions API
    pub base_url: String,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// Timeout for a single model request
    pub request_timeout_secs: u64,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    pub log_source: LogSourceConfig,

    pub modifier_lookup: ModifierLookup,

    /// From address shown on outgoing notifications
    pub email_sender: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if neither `GEMINI_API_KEY` nor
    /// `GOOGLE_API_KEY` is set, and `ConfigError::InvalidValue` for values
    /// that fail to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env is optional.
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let max_iterations = parse_env("MAX_ITERATIONS", 20)?;
        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 120)?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_env("PORT", 3000)?;

        let fetch_remote = std::env::var("BUILD_LOG_FETCH")
            .ok()
            .map(|v| {
                parse_bool(&v).map_err(|e| ConfigError::InvalidValue("BUILD_LOG_FETCH".to_string(), e))
            })
            .transpose()?
            .unwrap_or(false);

        let log_source = LogSourceConfig {
            fetch_remote,
            max_log_bytes: parse_env("MAX_LOG_BYTES", 200_000)?,
            ..LogSourceConfig::default()
        };

        let repo = std::env::var("GIT_REPO_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let modifier_lookup = match std::env::var("MODIFIER_LOOKUP") {
            Ok(v) => ModifierLookup::parse(&v, repo)?,
            Err(_) => ModifierLookup::Stub,
        };

        let email_sender =
            std::env::var("EMAIL_SENDER").unwrap_or_else(|_| DEFAULT_EMAIL_SENDER.to_string());

        Ok(Self {
            api_key,
            default_model,
            base_url,
            max_iterations,
            request_timeout_secs,
            host,
            port,
            log_source,
            modifier_lookup,
            email_sender,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, default_model: String) -> Self {
        Self {
            api_key,
            default_model,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_iterations: 20,
            request_timeout_secs: 120,
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_source: LogSourceConfig::default(),
            modifier_lookup: ModifierLookup::Stub,
            email_sender: DEFAULT_EMAIL_SENDER.to_string(),
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}
