//! Voice input and output
//!
//! Microphone capture, wake word gating, speech recognition, speech
//! synthesis, speaker playback, and the text cleanup applied before anything
//! is spoken.

mod capture;
mod playback;
mod sanitize;
mod speaker;
mod stt;
mod tts;
mod wake_word;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use playback::AudioPlayback;
pub use sanitize::sanitize;
pub use speaker::{ConsoleOutput, SpeechOutput, VoiceOutput};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use wake_word::{
    DEFAULT_COMMAND_PHRASE_LIMIT, DEFAULT_WAKE_PHRASE_LIMIT, ListenerState, SPEECH_ENERGY_THRESHOLD,
    WakeListener, extract_command, rms_energy, samples_duration,
};
