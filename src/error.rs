//! Error types for Cogload

use thiserror::Error;

/// Errors that can occur at the edges of the engine.
///
/// The analytical models themselves are total and never fail; these errors
/// come from parsing, persistence, configuration and experiment bookkeeping.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid check-in {id}: {reason}")]
    InvalidCheckIn { id: String, reason: String },

    #[error("Unknown experiment: {0}")]
    UnknownExperiment(String),

    #[error("Experiment already active: {0}")]
    ExperimentAlreadyActive(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Failures of the optional coaching text generator.
///
/// These never reach callers of the coaching service; any of them selects
/// the rule-based advice instead.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Text generation is not configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Service error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}
