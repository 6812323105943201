//! Error types for the offer builder.

use crate::wizard::{FieldKey, WizardStep};

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Prefill error: {0}")]
    Prefill(#[from] PrefillError),

    #[error("No advisor configured; set an LLM API key to enable advice")]
    AdvisorUnavailable,
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Wizard navigation and input errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Already at the last step")]
    AtLastStep,

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Field {field} is not part of step {step}")]
    FieldNotOnStep { field: FieldKey, step: WizardStep },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: FieldKey, reason: String },

    #[error("Session {0} not found")]
    SessionNotFound(uuid::Uuid),
}

/// Website prefill errors. Displayed inline to the user, so every message
/// starts with "Error:".
#[derive(Debug, thiserror::Error)]
pub enum PrefillError {
    #[error("Error: invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Error: failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Error: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Error: page at {url} has no readable text")]
    EmptyPage { url: String },

    #[error("Error: analysis failed: {0}")]
    Analysis(#[from] LlmError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
