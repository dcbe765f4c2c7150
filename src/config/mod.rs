//! Configuration management for Jarvis
//!
//! Layers, later wins: built-in defaults, the TOML file, then environment
//! variables (a `.env` file is loaded first). CLI flags are applied by the
//! binary on top.

pub mod file;

use std::time::Duration;

use secrecy::SecretString;

use crate::answer::{DEFAULT_BASE_URL, DEFAULT_MAX_REQUESTS, DEFAULT_MIN_SPACING, DEFAULT_MODEL};
use crate::news::{NewsFeed, default_feeds};
use crate::router::TrackLibrary;
use crate::voice::{DEFAULT_COMMAND_PHRASE_LIMIT, DEFAULT_WAKE_PHRASE_LIMIT};
use crate::{Error, Result};

pub use file::{JarvisConfigFile, config_file_path, load_config_file, load_config_file_from};

/// Default wake word
pub const DEFAULT_WAKE_WORD: &str = "jarvis";

/// Default reply to a bare wake word
pub const DEFAULT_ACKNOWLEDGEMENT: &str = "Yes Boss";

/// Default wait for a command after the wake word
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(4);

/// Jarvis configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Phrase that activates command capture
    pub wake_word: String,

    /// Spoken when the wake word is heard without a command
    pub acknowledgement: String,

    /// Question-answering backend
    pub answers: AnswerConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// RSS feeds for the news desk
    pub news_feeds: Vec<NewsFeed>,

    /// Tracks for the "play" command
    pub tracks: TrackLibrary,
}

/// Question-answering backend configuration
#[derive(Debug, Clone)]
pub struct AnswerConfig {
    /// Gemini API key; `None` is reported on first use
    pub api_key: Option<SecretString>,

    pub model: String,

    pub base_url: String,

    /// Backend requests allowed per 60 second window
    pub max_requests_per_minute: u32,

    /// Minimum gap between backend requests
    pub min_spacing: Duration,
}

/// Voice configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Microphone/speaker mode; text mode otherwise
    pub enabled: bool,

    /// OpenAI key for STT and TTS
    pub openai_api_key: Option<SecretString>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice (e.g. "alloy")
    pub tts_voice: String,

    /// TTS speed multiplier
    pub tts_speed: f32,

    /// Wait for a command after a bare wake word
    pub command_timeout: Duration,

    /// Longest segment checked for the wake word
    pub wake_phrase_limit: Duration,

    /// Longest command segment
    pub command_phrase_limit: Duration,
}

impl Config {
    /// Load configuration from `.env`, the config file and the environment
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid
    pub fn load(disable_voice: bool) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let file = load_config_file();
        Self::from_sources(file, |key| std::env::var(key).ok(), disable_voice)
    }

    /// Build configuration from a parsed file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid
    pub fn from_sources(
        file: JarvisConfigFile,
        env: impl Fn(&str) -> Option<String>,
        disable_voice: bool,
    ) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let wake_word = env("JARVIS_WAKE_WORD")
            .or(file.assistant.wake_word)
            .unwrap_or_else(|| DEFAULT_WAKE_WORD.to_string())
            .trim()
            .to_lowercase();
        if wake_word.is_empty() {
            return Err(Error::Config("wake word must not be empty".to_string()));
        }

        let acknowledgement = file
            .assistant
            .acknowledgement
            .unwrap_or_else(|| DEFAULT_ACKNOWLEDGEMENT.to_string());

        let answers = AnswerConfig {
            api_key: env("GEMINI_API_KEY")
                .or(file.answers.api_key)
                .map(SecretString::from),
            model: env("JARVIS_GEMINI_MODEL")
                .or(file.answers.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: file
                .answers
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_requests_per_minute: file
                .answers
                .max_requests_per_minute
                .unwrap_or(DEFAULT_MAX_REQUESTS),
            min_spacing: seconds(file.answers.min_spacing_secs, "answers.min_spacing_secs")?
                .unwrap_or(DEFAULT_MIN_SPACING),
        };
        if answers.max_requests_per_minute == 0 {
            return Err(Error::Config(
                "answers.max_requests_per_minute must be at least 1".to_string(),
            ));
        }
        if answers.api_key.is_none() {
            tracing::warn!(
                "GEMINI_API_KEY not set; general questions will report a configuration issue"
            );
        }

        let voice = VoiceConfig {
            enabled: !disable_voice && file.voice.enabled.unwrap_or(true),
            openai_api_key: env("OPENAI_API_KEY").map(SecretString::from),
            stt_model: env("JARVIS_STT_MODEL")
                .or(file.voice.stt_model)
                .unwrap_or_else(|| "whisper-1".to_string()),
            tts_model: env("JARVIS_TTS_MODEL")
                .or(file.voice.tts_model)
                .unwrap_or_else(|| "tts-1".to_string()),
            tts_voice: env("JARVIS_TTS_VOICE")
                .or(file.voice.tts_voice)
                .unwrap_or_else(|| "alloy".to_string()),
            tts_speed: file.voice.tts_speed.unwrap_or(1.0),
            command_timeout: seconds(
                file.voice.command_timeout_secs,
                "voice.command_timeout_secs",
            )?
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT),
            wake_phrase_limit: seconds(
                file.voice.wake_phrase_limit_secs,
                "voice.wake_phrase_limit_secs",
            )?
            .unwrap_or(DEFAULT_WAKE_PHRASE_LIMIT),
            command_phrase_limit: seconds(
                file.voice.command_phrase_limit_secs,
                "voice.command_phrase_limit_secs",
            )?
            .unwrap_or(DEFAULT_COMMAND_PHRASE_LIMIT),
        };
        if voice.wake_phrase_limit.is_zero() || voice.command_phrase_limit.is_zero() {
            return Err(Error::Config(
                "voice phrase limits must be greater than zero".to_string(),
            ));
        }

        let news_feeds = file.news.feeds.unwrap_or_else(default_feeds);

        let tracks = if file.music.is_empty() {
            TrackLibrary::builtin()
        } else {
            TrackLibrary::new(file.music)
        };

        Ok(Self {
            wake_word,
            acknowledgement,
            answers,
            voice,
            news_feeds,
            tracks,
        })
    }
}

fn seconds(value: Option<f64>, field: &str) -> Result<Option<Duration>> {
    value
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| Error::Config(format!("{field}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_sources(JarvisConfigFile::default(), env_from(&[]), false).unwrap();
        assert_eq!(config.wake_word, "jarvis");
        assert_eq!(config.acknowledgement, "Yes Boss");
        assert_eq!(config.answers.max_requests_per_minute, 10);
        assert_eq!(config.answers.min_spacing, Duration::from_secs(3));
        assert_eq!(config.answers.model, "gemini-2.5-flash");
        assert!(config.answers.api_key.is_none());
        assert!(config.voice.enabled);
        assert_eq!(config.news_feeds.len(), 3);
        assert_eq!(config.voice.wake_phrase_limit, Duration::from_secs(3));
        assert_eq!(config.voice.command_phrase_limit, Duration::from_secs(4));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = JarvisConfigFile::default();
        file.assistant.wake_word = Some("friday".to_string());
        file.answers.model = Some("file-model".to_string());

        let config = Config::from_sources(
            file,
            env_from(&[
                ("JARVIS_WAKE_WORD", "Computer"),
                ("GEMINI_API_KEY", "secret"),
            ]),
            false,
        )
        .unwrap();

        assert_eq!(config.wake_word, "computer");
        assert_eq!(config.answers.model, "file-model");
        assert_eq!(
            config.answers.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("secret".to_string())
        );
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = Config::from_sources(
            JarvisConfigFile::default(),
            env_from(&[("GEMINI_API_KEY", "  ")]),
            false,
        )
        .unwrap();
        assert!(config.answers.api_key.is_none());
    }

    #[test]
    fn test_disable_voice_wins() {
        let mut file = JarvisConfigFile::default();
        file.voice.enabled = Some(true);
        let config = Config::from_sources(file, env_from(&[]), true).unwrap();
        assert!(!config.voice.enabled);
    }

    #[test]
    fn test_invalid_values() {
        let mut file = JarvisConfigFile::default();
        file.answers.max_requests_per_minute = Some(0);
        assert!(Config::from_sources(file, env_from(&[]), false).is_err());

        let mut file = JarvisConfigFile::default();
        file.answers.min_spacing_secs = Some(-1.0);
        assert!(Config::from_sources(file, env_from(&[]), false).is_err());

        let mut file = JarvisConfigFile::default();
        file.voice.command_phrase_limit_secs = Some(0.0);
        assert!(Config::from_sources(file, env_from(&[]), false).is_err());
    }

    #[test]
    fn test_phrase_limits_from_file() {
        let mut file = JarvisConfigFile::default();
        file.voice.wake_phrase_limit_secs = Some(1.5);
        file.voice.command_phrase_limit_secs = Some(6.0);

        let config = Config::from_sources(file, env_from(&[]), false).unwrap();

        assert_eq!(config.voice.wake_phrase_limit, Duration::from_millis(1500));
        assert_eq!(config.voice.command_phrase_limit, Duration::from_secs(6));
    }

    #[test]
    fn test_music_table_replaces_builtin() {
        let mut file = JarvisConfigFile::default();
        file.music
            .insert("faded".to_string(), "https://example.com/faded".to_string());
        let config = Config::from_sources(file, env_from(&[]), false).unwrap();
        assert_eq!(config.tracks.len(), 1);
        assert_eq!(config.tracks.get("faded"), Some("https://example.com/faded"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = Config::from_sources(
            JarvisConfigFile::default(),
            env_from(&[("GEMINI_API_KEY", "super-secret-value")]),
            false,
        )
        .unwrap();
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }
}
