//! Error types for the session engine.

use sahay_core::error::SahayError;

/// Errors surfaced by the session engine.
///
/// Leaf-adapter failures are recovered inside the engine and rendered as
/// ordinary chat messages; the only capability failure that reaches the
/// caller is speech unavailability, which the presentation layer surfaces
/// as an immediate notice.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("speech capture is not available on this platform")]
    SpeechUnavailable,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("session state lock poisoned")]
    LockPoisoned,
}

impl From<SahayError> for SessionError {
    fn from(err: SahayError) -> Self {
        SessionError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            SessionError::SpeechUnavailable.to_string(),
            "speech capture is not available on this platform"
        );
        assert_eq!(
            SessionError::Storage("disk full".to_string()).to_string(),
            "storage error: disk full"
        );
    }

    #[test]
    fn test_from_sahay_error() {
        let err: SessionError = SahayError::Storage("db locked".to_string()).into();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(err.to_string().contains("db locked"));
    }
}
