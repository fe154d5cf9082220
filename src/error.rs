//! Error types for the smartcab crate

use thiserror::Error;

/// Main error type for the smartcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid percept: field '{field}' has unrecognized value '{value}'")]
    InvalidPercept { field: String, value: String },

    #[error("invalid action '{input}' (expected one of: {expected})")]
    ParseAction { input: String, expected: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("{parameter} must lie in (0, 1], got {value}")]
    ParameterOutOfRange { parameter: String, value: f64 },

    #[error("reward observed before any action was chosen")]
    NoPendingAction,

    #[error("no trial is in progress")]
    NoTrialInProgress,

    #[error("trial already completed after {steps} steps")]
    TrialAlreadyCompleted { steps: usize },

    #[error("world is not running a trial; call reset() first")]
    WorldNotReset,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("invalid tie-break '{input}'. Expected one of: {expected}")]
    ParseTieBreak { input: String, expected: String },

    #[error("invalid state encoding '{input}'. Expected one of: {expected}")]
    ParseEncoding { input: String, expected: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
