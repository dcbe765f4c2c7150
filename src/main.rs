use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jarvis_assistant::daemon::{answer_pipeline, voice_output};
use jarvis_assistant::news::{ALL_SOURCES, NewsMode, NewsRequest};
use jarvis_assistant::voice::{
    AudioCapture, AudioPlayback, ConsoleOutput, SPEECH_ENERGY_THRESHOLD, SpeechOutput, rms_energy,
};
use jarvis_assistant::{Config, Daemon, IntentRouter, sanitize};

/// Jarvis - wake-word voice assistant
#[derive(Parser)]
#[command(name = "jarvis", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read commands from stdin instead of the microphone
    #[arg(long)]
    text: bool,

    /// Disable voice features (for machines without audio hardware)
    #[arg(long, env = "JARVIS_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
#[allow(clippy::enum_variant_names)]
enum Command {
    /// Answer one question through the fallback table and backend
    Ask {
        /// Question text
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Show how an utterance would be routed
    Classify {
        /// Utterance text
        #[arg(required = true)]
        utterance: Vec<String>,
    },
    /// Print headlines without speaking them
    News {
        /// Feed key (dawn, express, geo) or "all"
        #[arg(default_value = ALL_SOURCES)]
        source: String,
        /// Maximum headlines
        #[arg(short, long, default_value = "6")]
        limit: usize,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,jarvis_assistant=info",
        1 => "info,jarvis_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let text_mode = cli.text || cli.disable_voice;

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Ask { question } => ask(&question.join(" ")).await,
            Command::Classify { utterance } => classify(&utterance.join(" ")),
            Command::News { source, limit } => news(source, limit).await,
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&text).await,
        };
    }

    let config = Config::load(text_mode)?;
    tracing::debug!(?config, "loaded configuration");

    if config.voice.enabled {
        tracing::info!("jarvis ready - say \"{}\"", config.wake_word);
    } else {
        tracing::info!("jarvis ready (text mode)");
    }

    Daemon::new(config)?.run().await?;
    Ok(())
}

/// Run one question through the answer pipeline
#[allow(clippy::future_not_send)]
async fn ask(question: &str) -> anyhow::Result<()> {
    let config = Config::load(true)?;
    let mut answers = answer_pipeline(&config);

    let mut output = ConsoleOutput;
    output.speak(&sanitize(&answers.ask(question).await)).await?;
    Ok(())
}

/// Print the routed action for an utterance
fn classify(utterance: &str) -> anyhow::Result<()> {
    let config = Config::load(true)?;
    let router = IntentRouter::with_tracks(config.tracks);
    println!("{:?}", router.classify(utterance));
    Ok(())
}

/// Print headlines for a source
async fn news(source: String, limit: usize) -> anyhow::Result<()> {
    let config = Config::load(true)?;
    let desk = jarvis_assistant::NewsDesk::new(
        config.news_feeds.clone(),
        Box::new(jarvis_assistant::news::HttpFeedSource::new()?),
    );
    let request = NewsRequest {
        source,
        limit,
        mode: NewsMode::Summary,
    };

    match desk.gather(&request).await {
        Ok(headlines) => println!(
            "{}",
            jarvis_assistant::news::render_list(request.mode, &headlines)
        ),
        Err(e) => println!("{}", e.user_message()),
    }
    Ok(())
}

/// Show per-second microphone energy against the speech threshold
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Listening for {duration} seconds, say something.");
    println!("Seconds marked 'speech' would reach the wake word detector.\n");

    let mut capture = AudioCapture::new(Duration::from_secs(2))?;
    capture.start()?;

    let mut speech_seconds = 0;
    for second in 1..=duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let energy = rms_energy(&capture.take_buffer());
        let is_speech = energy > SPEECH_ENERGY_THRESHOLD;
        if is_speech {
            speech_seconds += 1;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar = "#".repeat((energy / SPEECH_ENERGY_THRESHOLD * 10.0).min(40.0) as usize);
        let label = if is_speech { "speech" } else { "quiet" };
        println!("[{second:2}s] {energy:.4} {label:6} |{bar:<40}|");
    }

    capture.stop();
    println!("\n{speech_seconds} of {duration} seconds counted as speech.");
    Ok(())
}

/// Play a two second 440 Hz tone
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output: 440 Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;
    let sample_rate = 24000_u16;

    let samples: Vec<f32> = (0..u32::from(sample_rate) * 2)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 / f32::from(sample_rate);
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3
        })
        .collect();

    playback.play(samples)?;
    println!("If you heard the tone, the speakers work.");
    Ok(())
}

/// Speak text through TTS
#[allow(clippy::future_not_send)]
async fn test_tts(text: &str) -> anyhow::Result<()> {
    let config = Config::load(false)?;
    let mut output = voice_output(&config)?;

    let clean = sanitize(text);
    println!("Speaking: \"{clean}\"");
    output.speak(&clean).await?;
    Ok(())
}
