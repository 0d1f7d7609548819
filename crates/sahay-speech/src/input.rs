//! Speech-to-text capability port.

use async_trait::async_trait;

use sahay_core::types::Language;

/// Why a recognition attempt produced no transcript.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    /// The platform provides no recognition capability at all.
    #[error("speech recognition is not available on this platform")]
    Unavailable,
    /// Recognition ended without detecting any speech.
    #[error("no speech detected")]
    NoSpeech,
    /// Recognition was cancelled before it produced a result.
    #[error("recognition cancelled")]
    Cancelled,
    #[error("recognition failed: {0}")]
    Failed(String),
}

/// Single-shot speech recognition in a given language.
///
/// One call captures one utterance and resolves with its transcript.
/// Interim results are not surfaced. In every non-success case the caller
/// must leave its input buffer untouched and reset its listening indicator.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Whether the platform provides a recognition capability right now.
    fn is_available(&self) -> bool;

    /// Capture a single utterance and return its transcript.
    async fn recognize(&self, language: Language) -> Result<String, RecognitionError>;
}

/// Adapter for platforms without any recognition capability.
#[derive(Debug, Default)]
pub struct UnsupportedSpeechInput;

#[async_trait]
impl SpeechInput for UnsupportedSpeechInput {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize(&self, _language: Language) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unavailable)
    }
}
