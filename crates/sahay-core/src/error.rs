use thiserror::Error;

/// Top-level error type for the Sahay system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for SahayError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SahayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Clinic lookup error: {0}")]
    Clinic(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SahayError {
    fn from(err: toml::de::Error) -> Self {
        SahayError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SahayError {
    fn from(err: toml::ser::Error) -> Self {
        SahayError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SahayError {
    fn from(err: serde_json::Error) -> Self {
        SahayError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Sahay operations.
pub type Result<T> = std::result::Result<T, SahayError>;
