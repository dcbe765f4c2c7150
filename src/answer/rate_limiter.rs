//! Request limiter for the question-answering backend
//!
//! Two policies apply to every attempted request: a ceiling per fixed window
//! (rejects) and a minimum gap between requests (delays).

use std::time::Duration;

use tokio::time::Instant;

/// Default window length
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default requests allowed per window
pub const DEFAULT_MAX_REQUESTS: u32 = 10;

/// Default minimum gap between requests
pub const DEFAULT_MIN_SPACING: Duration = Duration::from_secs(3);

/// The window's ceiling has been reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtLimit;

/// Window/count/spacing state for backend requests
///
/// Owned by the answer pipeline and mutated through `&mut self`, so there is
/// a single writer at a time.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    min_spacing: Duration,
    window_start: Instant,
    request_count: u32,
    last_request_at: Option<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW, DEFAULT_MIN_SPACING)
    }
}

impl RateLimiter {
    /// Create a limiter with a fresh window starting now
    #[must_use]
    pub fn new(max_requests: u32, window: Duration, min_spacing: Duration) -> Self {
        Self {
            max_requests,
            window,
            min_spacing,
            window_start: Instant::now(),
            request_count: 0,
            last_request_at: None,
        }
    }

    /// Requests recorded in the current window
    #[must_use]
    pub const fn request_count(&self) -> u32 {
        self.request_count
    }

    /// Configured ceiling
    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Roll the window and check the ceiling at `now`
    ///
    /// Returns how long the caller must wait before dispatching. Does not
    /// record anything; call [`Self::record`] once the request is issued.
    ///
    /// # Errors
    ///
    /// Returns [`AtLimit`] when the window's ceiling has been reached
    pub fn check(&mut self, now: Instant) -> Result<Duration, AtLimit> {
        if now.duration_since(self.window_start) >= self.window {
            tracing::debug!(previous = self.request_count, "rate limit window reset");
            self.request_count = 0;
            self.window_start = now;
        }

        if self.request_count >= self.max_requests {
            return Err(AtLimit);
        }

        let wait = self.last_request_at.map_or(Duration::ZERO, |last| {
            self.min_spacing.saturating_sub(now.duration_since(last))
        });

        Ok(wait)
    }

    /// Record a dispatched request
    pub fn record(&mut self, now: Instant) {
        self.last_request_at = Some(now);
        self.request_count += 1;
    }

    /// Check, wait out the spacing, then record
    ///
    /// # Errors
    ///
    /// Returns [`AtLimit`] without waiting or recording when the ceiling has
    /// been reached
    pub async fn acquire(&mut self) -> Result<(), AtLimit> {
        let wait = self.check(Instant::now())?;

        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis(), "spacing out backend request");
            tokio::time::sleep(wait).await;
        }

        self.record(Instant::now());
        Ok(())
    }
}
