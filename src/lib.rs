//! Jarvis - wake-word voice assistant
//!
//! This library provides the pieces of a voice command dispatcher:
//! - Intent routing (sites, apps, music, news)
//! - A rate-limited, fallback-aware question-answering pipeline
//! - News headlines from RSS feeds
//! - Voice processing (wake word, STT, TTS) and speech text cleanup
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Voice (mic/STT)  │  Text (stdin)       │
//! └───────────────────┬──────────────────────────┘
//!                     │ utterance
//! ┌───────────────────▼──────────────────────────┐
//! │               Intent Router                   │
//! │   site │ app │ music │ news │ unmatched       │
//! └───────┬───────────────────────────┬──────────┘
//!         │ action                    │ question
//! ┌───────▼────────┐   ┌──────────────▼──────────┐
//! │ Launcher/News  │   │ Fallbacks → RateLimiter │
//! │                │   │      → Gemini backend   │
//! └───────┬────────┘   └──────────────┬──────────┘
//!         └──────────► sanitize ◄─────┘
//!                         │
//!                  Speech output (TTS)
//! ```

pub mod answer;
pub mod assistant;
pub mod config;
pub mod daemon;
pub mod error;
pub mod launcher;
pub mod news;
pub mod router;
pub mod voice;

pub use answer::{AnswerBackend, AnswerPipeline, FallbackTable, QaError, QaRequest, RateLimiter};
pub use assistant::Assistant;
pub use config::Config;
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use launcher::{Launcher, SystemLauncher};
pub use news::{Headline, NewsDesk, NewsMode, NewsRequest};
pub use router::{Action, IntentRouter, TrackLibrary};
pub use voice::sanitize;
