//! Error types for govnet operations.
//!
//! Invalid construction parameters are the only failure the simulation
//! itself can raise. Stepping never fails: missing partners, an absent
//! catalyst or an empty neighbor set are probabilistic no-ops.

use thiserror::Error;

/// Result type for govnet operations.
pub type Result<T> = std::result::Result<T, GovnetError>;

/// Errors that can occur while building or exporting a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GovnetError {
    /// Invalid model configuration; the simulation never starts.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for GovnetError {
    fn from(e: std::io::Error) -> Self {
        GovnetError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for GovnetError {
    fn from(e: serde_json::Error) -> Self {
        GovnetError::Serialization(e.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A per-type population count is negative.
    #[error("population count for {agent_type} is negative: {count}")]
    NegativeCount { agent_type: String, count: i64 },
    /// A probability parameter is outside [0, 1] (or NaN).
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    /// The project threshold is not a positive finite number.
    #[error("project resource threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
    /// A scheduled event targets step 0, which the step counter never reaches.
    #[error("{name} must be at least 1, got 0")]
    InvalidScheduleStep { name: &'static str },
    /// An initial-network strength is outside [0, 1].
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidStrength { name: &'static str, value: f64 },
}
