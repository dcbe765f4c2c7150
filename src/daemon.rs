//! Daemon - the turn loop
//!
//! Voice mode: capture, wake word, STT, assistant, TTS. Text mode reads
//! utterances from stdin. Turns are strictly sequential and nothing inside a
//! turn stops the loop; only Ctrl-C does.

use std::time::Duration;

use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::answer::{AnswerBackend, AnswerPipeline, DEFAULT_WINDOW, GeminiClient, RateLimiter};
use crate::assistant::{Assistant, say};
use crate::launcher::SystemLauncher;
use crate::news::{HttpFeedSource, NewsDesk};
use crate::router::IntentRouter;
use crate::voice::{
    AudioCapture, AudioPlayback, ConsoleOutput, SAMPLE_RATE, SpeechOutput, SpeechToText,
    TextToSpeech, VoiceOutput, WakeListener, samples_duration, samples_to_wav,
};
use crate::{Config, Error, Result};

/// Audio processing chunk size (100ms at 16kHz)
const CHUNK_SIZE: usize = 1600;

/// Poll interval for the capture buffer
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Build the assistant described by a configuration
///
/// # Errors
///
/// Returns error if the HTTP client for news cannot be built
pub fn build_assistant(config: &Config) -> Result<Assistant<GeminiClient>> {
    let news = NewsDesk::new(config.news_feeds.clone(), Box::new(HttpFeedSource::new()?));

    Ok(Assistant::new(
        IntentRouter::with_tracks(config.tracks.clone()),
        answer_pipeline(config),
        news,
        Box::new(SystemLauncher),
    ))
}

/// Gemini-backed answer pipeline with the configured limits
#[must_use]
pub fn answer_pipeline(config: &Config) -> AnswerPipeline<GeminiClient> {
    let backend = GeminiClient::with_base_url(
        config.answers.api_key.clone(),
        config.answers.model.clone(),
        config.answers.base_url.clone(),
    );
    let limiter = RateLimiter::new(
        config.answers.max_requests_per_minute,
        DEFAULT_WINDOW,
        config.answers.min_spacing,
    );
    AnswerPipeline::new(backend, limiter)
}

/// Create the TTS-backed speech output
///
/// # Errors
///
/// Returns error if no OpenAI key is configured or no speaker is available
pub fn voice_output(config: &Config) -> Result<VoiceOutput> {
    let tts = TextToSpeech::new(
        openai_key(config)?,
        config.voice.tts_model.clone(),
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
    )?;
    Ok(VoiceOutput::new(tts, AudioPlayback::new()?))
}

fn openai_key(config: &Config) -> Result<SecretString> {
    config
        .voice
        .openai_api_key
        .clone()
        .ok_or_else(|| Error::Config("OPENAI_API_KEY required for voice mode".to_string()))
}

/// The Jarvis daemon
pub struct Daemon {
    config: Config,
    assistant: Assistant<GeminiClient>,
}

impl Daemon {
    /// Create a daemon from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the assistant cannot be built
    pub fn new(config: Config) -> Result<Self> {
        let assistant = build_assistant(&config)?;
        Ok(Self { config, assistant })
    }

    /// Run until Ctrl-C (or end of input in text mode)
    ///
    /// # Errors
    ///
    /// Returns error if voice devices or keys are unavailable at start-up
    #[allow(clippy::future_not_send)]
    pub async fn run(self) -> Result<()> {
        if self.config.voice.enabled {
            self.run_voice().await
        } else {
            self.run_text().await
        }
    }

    /// Read utterances from stdin and print replies
    ///
    /// # Errors
    ///
    /// Returns error if stdin cannot be read
    #[allow(clippy::future_not_send)]
    pub async fn run_text(mut self) -> Result<()> {
        let mut output = ConsoleOutput;

        say(&mut output, "Initializing Jarvis").await;
        tracing::info!("text mode ready - type a command, Ctrl-D to quit");

        run_lines(
            &mut self.assistant,
            BufReader::new(tokio::io::stdin()),
            &mut output,
        )
        .await?;

        tracing::info!("daemon stopped");
        Ok(())
    }

    /// Listen on the microphone and answer out loud
    ///
    /// # Errors
    ///
    /// Returns error if audio devices or the OpenAI key are unavailable
    #[allow(clippy::future_not_send)]
    pub async fn run_voice(mut self) -> Result<()> {
        let stt = SpeechToText::new(
            openai_key(&self.config)?,
            self.config.voice.stt_model.clone(),
        )?;
        let mut output = voice_output(&self.config)?;
        let voice = &self.config.voice;
        let mut capture =
            AudioCapture::new(voice.wake_phrase_limit.max(voice.command_phrase_limit))?;
        let mut listener = WakeListener::new(&self.config.wake_word, voice.command_timeout)
            .with_phrase_limits(voice.wake_phrase_limit, voice.command_phrase_limit);

        say(&mut output, "Initializing Jarvis").await;
        capture.start()?;
        tracing::info!(wake_word = %self.config.wake_word, "listening for wake word");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                () = tokio::time::sleep(POLL_INTERVAL) => {
                    let processed = self
                        .process_voice_chunk(&capture, &mut listener, &stt, &mut output)
                        .await;
                    if let Err(e) = processed {
                        tracing::error!(error = %e, "voice processing error");
                        listener.reset();
                    }
                }
            }
        }

        capture.stop();
        tracing::info!("daemon stopped");
        Ok(())
    }

    /// Process buffered microphone audio
    #[allow(clippy::future_not_send)]
    async fn process_voice_chunk(
        &mut self,
        capture: &AudioCapture,
        listener: &mut WakeListener,
        stt: &SpeechToText,
        output: &mut dyn SpeechOutput,
    ) -> Result<()> {
        if listener.command_timed_out() {
            tracing::debug!("no command after wake word, back to idle");
            listener.reset();
            capture.clear_buffer();
            return Ok(());
        }

        if capture.buffered() < CHUNK_SIZE {
            return Ok(());
        }

        let samples = capture.take_buffer();
        if !listener.process(&samples) {
            return Ok(());
        }

        let segment = listener.take_segment();
        tracing::debug!(seconds = samples_duration(segment.len()), "speech segment ready");
        let wav = samples_to_wav(&segment, SAMPLE_RATE)?;

        if listener.is_activated() {
            match stt.transcribe(&wav).await {
                Ok(command) if !command.is_empty() => {
                    tracing::info!(command = %command, "command received");
                    self.assistant.handle(&command, output).await;
                }
                Ok(_) => tracing::debug!("empty command transcript"),
                Err(e) => tracing::warn!(error = %e, "command recognition failed"),
            }
            listener.reset();
        } else {
            let transcript = match stt.transcribe(&wav).await {
                Ok(transcript) => transcript,
                Err(e) => {
                    tracing::debug!(error = %e, "wake word recognition failed");
                    listener.reset();
                    return Ok(());
                }
            };

            match listener.check_wake_word(&transcript) {
                Some(command) if command.is_empty() => {
                    say(output, &self.config.acknowledgement).await;
                    // Restart the command timeout after the acknowledgement
                    listener.activate();
                }
                Some(command) => {
                    tracing::info!(command = %command, "command received with wake word");
                    self.assistant.handle(&command, output).await;
                    listener.reset();
                }
                None => tracing::trace!(transcript = %transcript, "no wake word"),
            }
        }

        // Drop audio captured while we were talking
        capture.clear_buffer();
        Ok(())
    }
}

/// Handle each line of `reader` as one utterance until end of input or Ctrl-C
///
/// Lines that are not valid UTF-8 are logged and skipped.
///
/// # Errors
///
/// Returns error if the reader fails
#[allow(clippy::future_not_send)]
pub async fn run_lines<B, R>(
    assistant: &mut Assistant<B>,
    mut reader: R,
    output: &mut dyn SpeechOutput,
) -> Result<()>
where
    B: AnswerBackend,
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                return Ok(());
            }
            read = reader.read_until(b'\n', &mut line) => read?,
        };
        if read == 0 {
            return Ok(());
        }

        match std::str::from_utf8(&line) {
            Ok(text) => assistant.handle(text, output).await,
            Err(e) => tracing::warn!(error = %e, "skipping input line that is not valid UTF-8"),
        }
    }
}
