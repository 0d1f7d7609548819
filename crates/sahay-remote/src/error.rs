//! Error types for the remote lookup clients.

use thiserror::Error;

/// A failed remote lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never produced a response (connect, timeout, DNS).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),
    /// The response arrived but did not have the expected shape.
    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_display() {
        assert_eq!(
            LookupError::Transport("connection refused".to_string()).to_string(),
            "request failed: connection refused"
        );
        assert_eq!(
            LookupError::Status(503).to_string(),
            "server returned status 503"
        );
        assert_eq!(
            LookupError::Malformed("missing field".to_string()).to_string(),
            "unexpected response: missing field"
        );
    }
}
