//! Text-to-speech capability port.

use tracing::debug;

use sahay_core::types::Language;

use crate::voices::VoiceCatalog;

/// Speaks text aloud in a given language.
///
/// Fire-and-forget: callers do not await playback completion, and a failure
/// to speak is never surfaced past this boundary.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str, language: Language);
}

/// Adapter for platforms without synthesis: resolves the voice it would have
/// used and logs the utterance instead of playing audio.
#[derive(Debug, Default)]
pub struct SilentSpeechOutput {
    catalog: VoiceCatalog,
}

impl SilentSpeechOutput {
    pub fn new(catalog: VoiceCatalog) -> Self {
        Self { catalog }
    }
}

impl SpeechOutput for SilentSpeechOutput {
    fn speak(&self, text: &str, language: Language) {
        match self.catalog.pick(language) {
            Some(voice) => debug!(voice = %voice.name, lang = %language, chars = text.len(), "speak"),
            None => debug!(voice = "default", lang = %language, chars = text.len(), "speak"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::Voice;

    #[test]
    fn test_silent_output_does_not_panic() {
        let out = SilentSpeechOutput::default();
        out.speak("hello", Language::Hindi);
        out.speak("", Language::Urdu);
    }

    #[test]
    fn test_silent_output_with_catalog() {
        let out = SilentSpeechOutput::new(VoiceCatalog::new(vec![Voice {
            name: "Lekha".to_string(),
            language: "hi-IN".to_string(),
        }]));
        out.speak("नमस्ते", Language::Hindi);
    }
}
