//! Wake word gating
//!
//! Audio is cut into speech segments by energy; each segment is transcribed
//! and the transcript is checked for the wake word. After a hit the listener
//! captures one more segment as the command.

use std::time::Duration;

use regex::RegexBuilder;
use tokio::time::Instant;

use super::capture::SAMPLE_RATE;

/// RMS energy above which a chunk counts as speech
pub const SPEECH_ENERGY_THRESHOLD: f32 = 0.03;

/// Longest segment that may carry the wake word
pub const DEFAULT_WAKE_PHRASE_LIMIT: Duration = Duration::from_secs(3);

/// Longest command segment after activation
pub const DEFAULT_COMMAND_PHRASE_LIMIT: Duration = Duration::from_secs(4);

/// Minimum speech length for a segment (0.3 s at 16 kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that closes a segment (0.5 s at 16 kHz)
const SILENCE_SAMPLES: usize = 8000;

/// Where the listener is in a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// Waiting for speech that might contain the wake word
    Idle,
    /// Accumulating a segment that might contain the wake word
    Listening,
    /// Wake word heard; capturing the command
    Activated,
}

/// Segments audio and tracks wake word activation
pub struct WakeListener {
    wake_word: String,
    command_timeout: Duration,
    wake_cap: usize,
    command_cap: usize,
    state: ListenerState,
    buffer: Vec<f32>,
    silence: usize,
    heard_speech: bool,
    activated_at: Option<Instant>,
}

impl WakeListener {
    /// Create a listener for `wake_word`
    ///
    /// `command_timeout` bounds how long an activation waits for the command
    /// to start.
    #[must_use]
    pub fn new(wake_word: &str, command_timeout: Duration) -> Self {
        let wake_word = wake_word.trim().to_lowercase();
        tracing::debug!(wake_word, "wake listener initialized");

        Self {
            wake_word,
            command_timeout,
            wake_cap: phrase_samples(DEFAULT_WAKE_PHRASE_LIMIT),
            command_cap: phrase_samples(DEFAULT_COMMAND_PHRASE_LIMIT),
            state: ListenerState::Idle,
            buffer: Vec::new(),
            silence: 0,
            heard_speech: false,
            activated_at: None,
        }
    }

    /// Cap segment length for the wake phrase and for the command
    ///
    /// A segment that reaches its cap is complete even without trailing
    /// silence, so steady noise cannot grow the buffer forever.
    #[must_use]
    pub fn with_phrase_limits(mut self, wake: Duration, command: Duration) -> Self {
        self.wake_cap = phrase_samples(wake);
        self.command_cap = phrase_samples(command);
        self
    }

    /// Feed captured samples
    ///
    /// Returns true when a complete segment (speech followed by silence, or
    /// speech up to the phrase limit) is ready in the buffer.
    pub fn process(&mut self, samples: &[f32]) -> bool {
        let is_speech = rms_energy(samples) > SPEECH_ENERGY_THRESHOLD;

        match self.state {
            ListenerState::Idle => {
                if is_speech {
                    self.state = ListenerState::Listening;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.silence = 0;
                    self.heard_speech = true;
                }
                false
            }
            ListenerState::Listening => {
                self.accumulate(samples, is_speech);

                if self.segment_complete() {
                    return true;
                }

                if self.silence > SILENCE_SAMPLES * 2 {
                    tracing::trace!("segment too short, resetting");
                    self.reset();
                }
                false
            }
            ListenerState::Activated => {
                if !self.heard_speech && !is_speech {
                    // Leading silence is not part of the command
                    return false;
                }
                if is_speech {
                    self.heard_speech = true;
                }
                self.accumulate(samples, is_speech);
                self.segment_complete()
            }
        }
    }

    fn accumulate(&mut self, samples: &[f32], is_speech: bool) {
        self.buffer.extend_from_slice(samples);
        if is_speech {
            self.silence = 0;
        } else {
            self.silence += samples.len();
        }
    }

    fn segment_complete(&self) -> bool {
        if !self.heard_speech {
            return false;
        }

        let cap = if self.state == ListenerState::Activated {
            self.command_cap
        } else {
            self.wake_cap
        };
        if self.buffer.len() >= cap {
            tracing::debug!(samples = self.buffer.len(), "phrase limit reached");
            return true;
        }

        self.silence > SILENCE_SAMPLES && self.buffer.len() > MIN_SPEECH_SAMPLES
    }

    /// Check a transcript for the wake word
    ///
    /// On a hit the listener switches to command capture and returns whatever
    /// followed the wake word in the same transcript.
    pub fn check_wake_word(&mut self, transcript: &str) -> Option<String> {
        let Some(command) = extract_command(transcript, &self.wake_word) else {
            self.reset();
            return None;
        };

        tracing::info!(wake_word = %self.wake_word, transcript, "wake word detected");
        self.activate();
        Some(command)
    }

    /// Switch to command capture
    pub fn activate(&mut self) {
        self.state = ListenerState::Activated;
        self.buffer.clear();
        self.silence = 0;
        self.heard_speech = false;
        self.activated_at = Some(Instant::now());
    }

    /// True when activated and no command has started within the timeout
    #[must_use]
    pub fn command_timed_out(&self) -> bool {
        self.state == ListenerState::Activated
            && !self.heard_speech
            && self
                .activated_at
                .is_some_and(|at| at.elapsed() >= self.command_timeout)
    }

    /// Take the buffered segment, clearing it
    pub fn take_segment(&mut self) -> Vec<f32> {
        self.silence = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Back to idle
    pub fn reset(&mut self) {
        self.state = ListenerState::Idle;
        self.buffer.clear();
        self.silence = 0;
        self.heard_speech = false;
        self.activated_at = None;
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ListenerState {
        self.state
    }

    /// Whether the listener is capturing a command
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.state == ListenerState::Activated
    }

    /// Normalized wake word
    #[must_use]
    pub fn wake_word(&self) -> &str {
        &self.wake_word
    }
}

/// Text after the wake word, if the transcript contains it
///
/// Matching is case-insensitive and the returned command keeps the
/// transcript's own casing. Returns `Some("")` when the wake word is the whole
/// utterance.
#[must_use]
pub fn extract_command(transcript: &str, wake_word: &str) -> Option<String> {
    let wake_word = wake_word.trim();
    if wake_word.is_empty() {
        return None;
    }

    let pattern = RegexBuilder::new(&regex::escape(wake_word))
        .case_insensitive(true)
        .build()
        .ok()?;
    let found = pattern.find(transcript)?;

    Some(
        transcript[found.end()..]
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',' || c == '.' || c == '!')
            .trim_end()
            .to_string(),
    )
}

/// Seconds of audio held by a sample count
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn samples_duration(samples: usize) -> f32 {
    samples as f32 / SAMPLE_RATE as f32
}

fn phrase_samples(limit: Duration) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let samples = (limit.as_secs_f64() * f64::from(SAMPLE_RATE)) as usize;
    samples
}

/// RMS energy of a chunk
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
