use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SahayError};

/// Top-level configuration for the Sahay application.
///
/// Loaded from `~/.sahay/config.toml` by default. Each section corresponds
/// to a component or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SahayConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub clinics: ClinicConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl SahayConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SahayConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SahayError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the history database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Initial spoken language as a locale tag, e.g. `hi-IN`.
    pub language: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.sahay/data".to_string(),
            log_level: "info".to_string(),
            language: "hi-IN".to_string(),
        }
    }
}

/// AI completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Chat completion endpoint URL.
    pub endpoint: String,
    /// Bearer token for the completion endpoint. Empty means unauthenticated.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Maximum characters of a reply that are stored and displayed. Longer
    /// replies are truncated with a trailing ellipsis; speech output always
    /// receives the untruncated text.
    pub reply_char_limit: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.cohere.ai/v1/chat".to_string(),
            api_key: String::new(),
            model: "command-r-plus".to_string(),
            temperature: 0.7,
            max_tokens: 300,
            reply_char_limit: 400,
        }
    }
}

/// Clinic locator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    /// Place-search endpoint URL.
    pub endpoint: String,
    /// Number of top-ranked results to keep.
    pub max_results: usize,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            max_results: 5,
        }
    }
}

/// Speech capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether spoken replies are enabled at all.
    pub enabled: bool,
    /// Seconds between consecutive spoken first-aid tips.
    pub tip_stagger_secs: f64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tip_stagger_secs: 2.5,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// History database file name, relative to the data directory.
    pub db_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: "history.db".to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SahayConfig::default();
        assert_eq!(config.general.language, "hi-IN");
        assert_eq!(config.assistant.model, "command-r-plus");
        assert_eq!(config.assistant.max_tokens, 300);
        assert_eq!(config.assistant.reply_char_limit, 400);
        assert_eq!(config.clinics.max_results, 5);
        assert!(config.speech.enabled);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = SahayConfig::default();
        config.general.log_level = "debug".to_string();
        config.assistant.api_key = "secret".to_string();
        config.save(&path).unwrap();

        let loaded = SahayConfig::load(&path).unwrap();
        assert_eq!(loaded.general.log_level, "debug");
        assert_eq!(loaded.assistant.api_key, "secret");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(SahayConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = SahayConfig::load_or_default(&path);
        assert_eq!(config.assistant.model, "command-r-plus");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general]\nlog_level = \"trace\"\n").unwrap();

        let config = SahayConfig::load(&path).unwrap();
        assert_eq!(config.general.log_level, "trace");
        // Untouched sections keep their defaults.
        assert_eq!(config.general.language, "hi-IN");
        assert_eq!(config.clinics.max_results, 5);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        SahayConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
