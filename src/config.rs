//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Application configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when no API key is set; advice and prefill are then unavailable.
    pub llm: Option<LlmConfig>,
    pub port: u16,
    /// Sessions idle longer than this are pruned.
    pub session_idle_timeout: Duration,
    /// Timeout for website fetches during prefill.
    pub fetch_timeout: Duration,
    /// Whether to run the terminal wizard alongside the HTTP server.
    pub run_cli: bool,
    /// Directory for daily-rolling log files, if any.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: None,
            port: DEFAULT_PORT,
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            run_cli: true,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Unparsable numbers fall back to
    /// defaults; an unknown backend name is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend: LlmBackend = match non_empty("OFFER_BUILDER_LLM_BACKEND") {
            Some(name) => name.parse()?,
            None => LlmBackend::Anthropic,
        };

        let llm = non_empty(backend.api_key_var()).map(|key| LlmConfig {
            backend,
            api_key: secrecy::SecretString::from(key),
            model: non_empty("OFFER_BUILDER_MODEL")
                .unwrap_or_else(|| backend.default_model().to_string()),
        });

        let port: u16 = non_empty("OFFER_BUILDER_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let idle_secs: u64 = non_empty("OFFER_BUILDER_SESSION_IDLE_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_SESSION_IDLE_SECS);

        let fetch_secs: u64 = non_empty("OFFER_BUILDER_FETCH_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        let run_cli = !non_empty("OFFER_BUILDER_NO_CLI").is_some_and(|v| is_truthy(&v));

        Ok(Self {
            llm,
            port,
            session_idle_timeout: Duration::from_secs(idle_secs),
            fetch_timeout: Duration::from_secs(fetch_secs),
            run_cli,
            log_dir: non_empty("OFFER_BUILDER_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
