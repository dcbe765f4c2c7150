//! TOML configuration file loading
//!
//! Supports `~/.config/jarvis/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::news::NewsFeed;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct JarvisConfigFile {
    #[serde(default)]
    pub assistant: AssistantFileConfig,

    /// Question-answering backend
    #[serde(default)]
    pub answers: AnswersFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    #[serde(default)]
    pub news: NewsFileConfig,

    /// Track key to URL
    #[serde(default)]
    pub music: BTreeMap<String, String>,
}

/// Wake word and acknowledgement
#[derive(Debug, Default, Deserialize)]
pub struct AssistantFileConfig {
    pub wake_word: Option<String>,

    /// Spoken when the wake word is heard alone (e.g. "Yes Boss")
    pub acknowledgement: Option<String>,
}

/// Question-answering backend configuration
#[derive(Debug, Default, Deserialize)]
pub struct AnswersFileConfig {
    /// Gemini API key (prefer `GEMINI_API_KEY`)
    pub api_key: Option<String>,

    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: Option<String>,

    pub base_url: Option<String>,

    /// Backend requests allowed per 60 second window
    pub max_requests_per_minute: Option<u32>,

    /// Minimum seconds between backend requests
    pub min_spacing_secs: Option<f64>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable microphone/speaker mode
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,

    /// Seconds to wait for a command after the wake word
    pub command_timeout_secs: Option<f64>,

    /// Longest wake phrase segment in seconds
    pub wake_phrase_limit_secs: Option<f64>,

    /// Longest command segment in seconds
    pub command_phrase_limit_secs: Option<f64>,
}

/// News feed overrides
#[derive(Debug, Default, Deserialize)]
pub struct NewsFileConfig {
    /// Replaces the built-in feed list when present
    pub feeds: Option<Vec<NewsFeed>>,
}

/// Load the TOML config file from the standard path
///
/// Returns `JarvisConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> JarvisConfigFile {
    config_file_path().map_or_else(JarvisConfigFile::default, |path| load_config_file_from(&path))
}

/// Load a TOML config file from an explicit path, with the same fallbacks
pub fn load_config_file_from(path: &Path) -> JarvisConfigFile {
    if !path.exists() {
        return JarvisConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                JarvisConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            JarvisConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/jarvis/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("jarvis").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[assistant]
wake_word = "friday"

[answers]
max_requests_per_minute = 4

[music]
faded = "https://example.com/faded"
"#
        )
        .unwrap();

        let config = load_config_file_from(file.path());
        assert_eq!(config.assistant.wake_word.as_deref(), Some("friday"));
        assert_eq!(config.answers.max_requests_per_minute, Some(4));
        assert_eq!(config.answers.model, None);
        assert_eq!(
            config.music.get("faded").map(String::as_str),
            Some("https://example.com/faded")
        );
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is = = not toml").unwrap();

        let config = load_config_file_from(file.path());
        assert!(config.assistant.wake_word.is_none());
    }

    #[test]
    fn test_missing_file() {
        let config = load_config_file_from(Path::new("/nonexistent/jarvis/config.toml"));
        assert!(config.music.is_empty());
    }
}
