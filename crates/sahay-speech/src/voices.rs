//! Voice selection for speech synthesis.

use sahay_core::types::Language;

/// One synthesis voice exposed by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// Locale tag of the voice, e.g. `hi-IN`.
    pub language: String,
}

/// The set of voices the platform exposes, queried at call time.
///
/// Selection prefers a voice whose language tag matches the requested
/// language exactly; otherwise the platform default (represented here by
/// `None`) is used silently.
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    voices: Vec<Voice>,
}

impl VoiceCatalog {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }

    /// Pick the first voice whose tag matches `language` exactly.
    pub fn pick(&self, language: Language) -> Option<&Voice> {
        self.voices.iter().find(|v| v.language == language.tag())
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VoiceCatalog {
        VoiceCatalog::new(vec![
            Voice {
                name: "Lekha".to_string(),
                language: "hi-IN".to_string(),
            },
            Voice {
                name: "Veena".to_string(),
                language: "ta-IN".to_string(),
            },
            Voice {
                name: "Rishi".to_string(),
                language: "en-IN".to_string(),
            },
        ])
    }

    #[test]
    fn test_pick_exact_match() {
        let voice = catalog().pick(Language::Tamil).cloned();
        assert_eq!(voice.unwrap().name, "Veena");
    }

    #[test]
    fn test_pick_no_match_falls_back_to_none() {
        assert!(catalog().pick(Language::Bengali).is_none());
    }

    #[test]
    fn test_pick_first_of_duplicates() {
        let cat = VoiceCatalog::new(vec![
            Voice {
                name: "First".to_string(),
                language: "hi-IN".to_string(),
            },
            Voice {
                name: "Second".to_string(),
                language: "hi-IN".to_string(),
            },
        ]);
        assert_eq!(cat.pick(Language::Hindi).unwrap().name, "First");
    }

    #[test]
    fn test_empty_catalog() {
        let cat = VoiceCatalog::default();
        assert!(cat.is_empty());
        assert!(cat.pick(Language::Hindi).is_none());
    }
}
