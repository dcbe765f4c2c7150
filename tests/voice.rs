//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;
use std::time::Duration;

use jarvis_assistant::voice::{
    ListenerState, SAMPLE_RATE, WakeListener, extract_command, samples_duration, samples_to_wav,
};

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

fn listener() -> WakeListener {
    WakeListener::new("Jarvis", Duration::from_secs(4))
}

#[test]
fn test_listener_creation() {
    let listener = listener();

    assert_eq!(listener.state(), ListenerState::Idle);
    assert_eq!(listener.wake_word(), "jarvis");
    assert!(!listener.is_activated());
}

#[test]
fn test_silence_stays_idle() {
    let mut listener = listener();

    assert!(!listener.process(&generate_silence(1.0)));
    assert_eq!(listener.state(), ListenerState::Idle);
}

#[test]
fn test_speech_then_silence_completes_segment() {
    let mut listener = listener();

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    assert!(!listener.process(&speech));
    assert_eq!(listener.state(), ListenerState::Listening);

    let silence = generate_silence(0.6);
    assert!(listener.process(&silence));

    let segment = listener.take_segment();
    assert_eq!(segment.len(), speech.len() + silence.len());
}

#[test]
fn test_wake_word_alone_activates() {
    let mut listener = listener();

    assert_eq!(listener.check_wake_word("Jarvis."), Some(String::new()));
    assert!(listener.is_activated());
}

#[test]
fn test_wake_word_with_command() {
    let mut listener = listener();

    assert_eq!(
        listener.check_wake_word("Hey Jarvis, open YouTube"),
        Some("open YouTube".to_string())
    );
}

#[test]
fn test_transcript_without_wake_word_resets() {
    let mut listener = listener();
    listener.process(&generate_sine_samples(440.0, 0.5, 0.3));

    assert_eq!(listener.check_wake_word("what a nice day"), None);
    assert_eq!(listener.state(), ListenerState::Idle);
}

#[test]
fn test_activated_ignores_leading_silence() {
    let mut listener = listener();
    listener.activate();

    assert!(!listener.process(&generate_silence(1.0)));
    assert!(listener.take_segment().is_empty());

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    assert!(!listener.process(&speech));
    assert!(listener.process(&generate_silence(0.6)));
}

/// Feed 100 ms chunks of steady noise until a segment completes
fn chunks_until_complete(listener: &mut WakeListener, max_chunks: usize) -> Option<usize> {
    let noise = vec![0.5; 1600];
    (1..=max_chunks).find(|_| listener.process(&noise))
}

#[test]
fn test_steady_noise_stops_at_wake_phrase_limit() {
    let mut listener =
        listener().with_phrase_limits(Duration::from_secs(1), Duration::from_secs(2));

    assert_eq!(chunks_until_complete(&mut listener, 100), Some(10));
    assert_eq!(listener.take_segment().len(), 16_000);
}

#[test]
fn test_steady_noise_stops_at_command_phrase_limit() {
    let mut listener =
        listener().with_phrase_limits(Duration::from_secs(1), Duration::from_secs(2));
    listener.activate();

    assert_eq!(chunks_until_complete(&mut listener, 100), Some(20));
    assert_eq!(listener.take_segment().len(), 32_000);
}

#[test]
fn test_default_phrase_limits_bound_the_buffer() {
    let mut listener = listener();

    assert_eq!(chunks_until_complete(&mut listener, 1000), Some(30));

    listener.activate();
    assert_eq!(chunks_until_complete(&mut listener, 1000), Some(40));
}

#[tokio::test(start_paused = true)]
async fn test_command_timeout() {
    let mut listener = listener();
    listener.activate();

    tokio::time::advance(Duration::from_secs(3)).await;
    assert!(!listener.command_timed_out());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(listener.command_timed_out());
}

#[tokio::test(start_paused = true)]
async fn test_speech_cancels_command_timeout() {
    let mut listener = listener();
    listener.activate();

    listener.process(&generate_sine_samples(440.0, 0.3, 0.3));
    tokio::time::advance(Duration::from_secs(10)).await;

    assert!(!listener.command_timed_out());
}

#[test]
fn test_extract_command() {
    assert_eq!(
        extract_command("JARVIS play faded", "jarvis"),
        Some("play faded".to_string())
    );
    assert_eq!(extract_command("nothing here", "jarvis"), None);
    assert_eq!(extract_command("jarvis", ""), None);
}

#[test]
fn test_wake_word_next_to_case_changing_chars() {
    let mut listener = listener();

    assert_eq!(
        listener.check_wake_word("ȺȺjarvis \u{212A}"),
        Some("\u{212A}".to_string())
    );
    assert!(listener.is_activated());
}

#[test]
fn test_samples_duration() {
    assert!((samples_duration(16000) - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");
    assert!(wav_data.len() > 44);
}

#[test]
fn test_wav_readback() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav_data)).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
    assert_eq!(read_samples[3], 32767);
}
