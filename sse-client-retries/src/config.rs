//! Retry configuration.

use sse_client_core::{ConnectionOptions, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use std::time::Duration;

/// Configuration for connection retries.
///
/// Every failure is retried with the same fixed delay until
/// `max_attempts` attempts have been made. There is never a delay after the
/// last attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first. At least 1.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the retry policy from connection options.
    pub fn from_options(options: &ConnectionOptions) -> Self {
        Self {
            max_attempts: options.attempts(),
            delay: options.retry_delay,
        }
    }

    /// Set the total number of attempts. Values below 1 become 1.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Use a fixed delay between attempts.
    pub fn fixed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// How long to wait after failed attempt `attempt` (1-indexed), or `None`
    /// if it was the last one.
    pub fn wait_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts.max(1) {
            None
        } else {
            Some(self.delay)
        }
    }
}
