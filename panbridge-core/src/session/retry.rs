//! Reconnection with exponential backoff
//!
//! The first attempt runs immediately. Attempt `n` (0-indexed, `n > 0`) waits
//! `min(initial_delay * multiplier^(n-1), max_delay)` first.

use std::time::Duration;

/// Default number of connection attempts before a command fails
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the second attempt in milliseconds
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// Default cap on a single delay in milliseconds
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// Default backoff multiplier (delay doubles each retry)
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// How the session client retries a lost connection
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Connection attempts per command, at least 1
    pub max_attempts: u32,
    /// Delay before the second attempt in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound on any single delay in milliseconds
    pub max_delay_ms: u64,
    /// Multiplier applied per further attempt
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryConfig {
    /// Creates the default policy: 3 attempts, 1s then 2s apart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single attempt, no retries
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the number of attempts
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the delay before the second attempt
    #[must_use]
    pub const fn with_initial_delay_ms(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    /// Sets the cap on a single delay
    #[must_use]
    pub const fn with_max_delay_ms(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    /// Sets the backoff multiplier
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Attempts actually made; a configured 0 still tries once
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait before `attempt` (0-indexed)
    ///
    /// Returns `None` when `attempt` is past the budget.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.attempts() {
            return None;
        }
        if attempt == 0 {
            return Some(Duration::ZERO);
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let delay_ms = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped_delay_ms = (delay_ms as u64).min(self.max_delay_ms);

        Some(Duration::from_millis(capped_delay_ms))
    }
}
