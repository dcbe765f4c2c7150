//! Speech output seam
//!
//! Everything the assistant says goes through a [`SpeechOutput`]. Callers
//! sanitize first; implementations only render.

use async_trait::async_trait;

use super::{AudioPlayback, TextToSpeech};
use crate::Result;

/// Renders a reply to the user
#[async_trait(?Send)]
pub trait SpeechOutput {
    /// Say `text` and wait until it has been delivered
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;
}

/// Synthesizes with TTS and plays through the speakers
pub struct VoiceOutput {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

impl VoiceOutput {
    /// Combine a synthesizer and an output device
    #[must_use]
    pub const fn new(tts: TextToSpeech, playback: AudioPlayback) -> Self {
        Self { tts, playback }
    }
}

#[async_trait(?Send)]
impl SpeechOutput for VoiceOutput {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        tracing::info!(text, "speaking");
        let audio = self.tts.synthesize(text).await?;
        self.playback.play_mp3(&audio)?;
        tracing::debug!("speech completed");
        Ok(())
    }
}

/// Prints replies to stdout (text mode)
#[derive(Debug, Default)]
pub struct ConsoleOutput;

#[async_trait(?Send)]
impl SpeechOutput for ConsoleOutput {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if !text.is_empty() {
            println!("jarvis> {text}");
        }
        Ok(())
    }
}
