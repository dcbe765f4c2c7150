//! Answer pipeline for questions no intent rule claimed
//!
//! Canned fallbacks first, then the external backend behind the rate
//! limiter. Backend failures come back as spoken messages, never as errors.

mod backend;
mod fallback;
mod gemini;
mod rate_limiter;

pub use backend::{AnswerBackend, BREVITY_INSTRUCTION, QaError, QaRequest};
pub use fallback::{FallbackEntry, FallbackReply, FallbackTable};
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
pub use rate_limiter::{
    AtLimit, DEFAULT_MAX_REQUESTS, DEFAULT_MIN_SPACING, DEFAULT_WINDOW, RateLimiter,
};

/// Spoken when the local per-window ceiling is hit
pub const AT_RATE_LIMIT_MESSAGE: &str =
    "I'm currently at my rate limit. Please try again in a minute or ask me simple questions.";

/// Fallback table, limiter and backend composed into `ask`
pub struct AnswerPipeline<B> {
    fallbacks: FallbackTable,
    limiter: RateLimiter,
    backend: B,
}

impl<B: AnswerBackend> AnswerPipeline<B> {
    /// Create a pipeline with the default fallback table
    pub fn new(backend: B, limiter: RateLimiter) -> Self {
        Self::with_fallbacks(backend, limiter, FallbackTable::default())
    }

    /// Create a pipeline with a custom fallback table
    pub const fn with_fallbacks(
        backend: B,
        limiter: RateLimiter,
        fallbacks: FallbackTable,
    ) -> Self {
        Self {
            fallbacks,
            limiter,
            backend,
        }
    }

    /// Limiter state, mainly for inspection
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Answer a question
    ///
    /// Fallback hits and limit rejections leave the limiter untouched.
    pub async fn ask(&mut self, question: &str) -> String {
        if let Some(reply) = self.fallbacks.lookup(question) {
            return reply;
        }

        if self.limiter.acquire().await.is_err() {
            tracing::warn!(
                count = self.limiter.request_count(),
                "answer backend at rate limit"
            );
            return AT_RATE_LIMIT_MESSAGE.to_string();
        }

        tracing::info!(
            count = self.limiter.request_count(),
            max = self.limiter.max_requests(),
            "asking answer backend"
        );

        match self.backend.generate(&QaRequest::brief(question)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "answer backend failed");
                e.user_message().to_string()
            }
        }
    }
}
