//! Question-answering backend contract and failure taxonomy

use async_trait::async_trait;
use thiserror::Error;

/// Instruction appended to every question
pub const BREVITY_INSTRUCTION: &str = "Answer in 2-3 short sentences.";

/// Question plus the instruction that keeps answers speakable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaRequest {
    pub question: String,
    pub instruction: String,
}

impl QaRequest {
    /// Request with the default brevity instruction
    #[must_use]
    pub fn brief(question: &str) -> Self {
        Self {
            question: question.to_string(),
            instruction: BREVITY_INSTRUCTION.to_string(),
        }
    }

    /// Prompt text sent to the model
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("{}\n\n{}", self.question, self.instruction)
    }
}

/// Classified backend failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QaError {
    /// Provider throttled the request (HTTP 429)
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Provider quota exhausted
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Missing or rejected API key
    #[error("auth error: {0}")]
    Auth(String),

    /// Anything else; not retried
    #[error("transient error: {0}")]
    Transient(String),
}

impl QaError {
    /// Classify a raw error message by its markers
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();

        if message.contains("429") {
            Self::RateLimited(message.to_string())
        } else if lowered.contains("quota") {
            Self::QuotaExceeded(message.to_string())
        } else if lowered.contains("api key") || lowered.contains("api_key") {
            Self::Auth(message.to_string())
        } else {
            Self::Transient(message.to_string())
        }
    }

    /// Classify an HTTP error response
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = format!("{status}: {body}");
        match status.as_u16() {
            401 | 403 => Self::Auth(message),
            429 if body.to_lowercase().contains("quota") => Self::QuotaExceeded(message),
            429 => Self::RateLimited(message),
            _ => Self::classify(&message),
        }
    }

    /// Spoken message for this failure
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::RateLimited(_) | Self::QuotaExceeded(_) => {
                "I've reached my API limit for now. Try again in a minute, or ask me to open apps or get news instead."
            }
            Self::Auth(_) => "There's an issue with my configuration. Please check the API key.",
            Self::Transient(_) => "Sorry, I couldn't process that request right now.",
        }
    }
}

/// Something that can answer a question
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Generate an answer
    ///
    /// # Errors
    ///
    /// Returns a classified [`QaError`] on failure
    async fn generate(&self, request: &QaRequest) -> Result<String, QaError>;
}
