//! Microphone capture
//!
//! Input is kept as 16 kHz mono. Devices without a mono mode are downmixed in
//! the callback, and the buffer only keeps the newest samples up to a limit so
//! audio piling up while Jarvis talks cannot grow without bound.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Capture sample rate (16 kHz mono, what Whisper expects)
pub const SAMPLE_RATE: u32 = 16000;

/// Mono samples waiting to be processed, oldest dropped first
#[derive(Debug)]
struct CaptureBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
    dropped: usize,
}

impl CaptureBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Append interleaved frames, averaging channels to mono
    #[allow(clippy::cast_precision_loss)]
    fn push_interleaved(&mut self, data: &[f32], channels: usize) {
        if channels <= 1 {
            self.samples.extend(data);
        } else {
            self.samples.extend(
                data.chunks(channels)
                    .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32),
            );
        }

        let overflow = self.samples.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.samples.drain(..overflow);
            self.dropped += overflow;
        }
    }

    fn take(&mut self) -> Vec<f32> {
        if self.dropped > 0 {
            tracing::debug!(
                dropped = self.dropped,
                "capture limit reached, oldest audio discarded"
            );
            self.dropped = 0;
        }
        self.samples.drain(..).collect()
    }

    fn clear(&mut self) {
        self.samples.clear();
        self.dropped = 0;
    }
}

/// Captures speech from the default input device
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<CaptureBuffer>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Open the default input device at 16 kHz
    ///
    /// At most `max_buffered` of audio is held between reads.
    ///
    /// # Errors
    ///
    /// Returns error if no input device supports 16 kHz
    pub fn new(max_buffered: Duration) -> Result<Self> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let candidates: Vec<_> = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .filter(|c| {
                c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .collect();

        let supported = candidates
            .iter()
            .find(|c| c.channels() == 1)
            .or_else(|| candidates.first())
            .cloned()
            .ok_or_else(|| Error::Audio("no 16 kHz input config".to_string()))?;

        let config = supported.with_sample_rate(SampleRate(SAMPLE_RATE)).config();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let capacity = (max_buffered.as_secs_f64() * f64::from(SAMPLE_RATE)) as usize;

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            channels = config.channels,
            capacity,
            "microphone opened"
        );

        Ok(Self {
            device,
            config,
            buffer: Arc::new(Mutex::new(CaptureBuffer::new(capacity))),
            stream: None,
        })
    }

    /// Start the input stream (no-op if already running)
    ///
    /// # Errors
    ///
    /// Returns error if the stream cannot be built or started
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let channels = usize::from(self.config.channels);
        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_interleaved(data, channels);
                    }
                },
                |err| tracing::error!(error = %err, "microphone stream error"),
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);
        tracing::debug!("microphone capture started");
        Ok(())
    }

    /// Stop the input stream
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("microphone capture stopped");
        }
    }

    /// Drain the samples captured since the last call
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| buf.take())
            .unwrap_or_default()
    }

    /// Number of samples waiting in the buffer
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer
            .lock()
            .map(|buf| buf.samples.len())
            .unwrap_or_default()
    }

    /// Drop buffered samples
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }
}

/// Encode mono samples as 16-bit PCM WAV for the STT API
///
/// # Errors
///
/// Returns error if the segment is too long for a WAV file or encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let count = u32::try_from(samples.len())
        .map_err(|_| Error::Audio("segment too long for WAV".to_string()))?;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut wav = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    let mut writer =
        hound::WavWriter::new(&mut wav, spec).map_err(|e| Error::Audio(e.to_string()))?;

    let mut pcm = writer.get_i16_writer(count);
    for &sample in samples {
        pcm.write_sample(to_pcm16(sample));
    }
    pcm.flush().map_err(|e| Error::Audio(e.to_string()))?;
    writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;

    Ok(wav.into_inner())
}

#[allow(clippy::cast_possible_truncation)]
fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}
