//! Client errors.

use sse_client_retries::{ConnectError, RetryError};
use sse_client_streaming::StreamError;
use thiserror::Error;

/// Errors surfaced by [`EventSourceClient::stream`](crate::EventSourceClient::stream).
#[derive(Debug, Error)]
pub enum EventSourceError {
    /// The configured URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Every connection attempt failed; `source` is the last attempt's error.
    #[error("failed to connect after {attempts} attempt(s): {source}")]
    Connect {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        source: ConnectError,
    },

    /// The pre-opened body could not be obtained.
    #[error("failed to read pre-opened body: {0}")]
    BodyRead(String),

    /// Reading the open stream failed. Not retried.
    #[error("stream read failed: {0}")]
    Read(#[from] StreamError),

    /// The cancellation token fired.
    #[error("streaming was cancelled")]
    Cancelled,
}

impl EventSourceError {
    /// Whether streaming stopped because of cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether the connection could not be established.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }
}

impl From<RetryError<ConnectError>> for EventSourceError {
    fn from(err: RetryError<ConnectError>) -> Self {
        match err {
            RetryError::Exhausted { attempts, last } => Self::Connect {
                attempts,
                source: last,
            },
            RetryError::Cancelled => Self::Cancelled,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, EventSourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_retry_error() {
        let err = EventSourceError::from(RetryError::Exhausted {
            attempts: 3,
            last: ConnectError::http(500, "boom"),
        });
        assert!(err.is_connect());
        assert_eq!(
            err.to_string(),
            "failed to connect after 3 attempt(s): HTTP error 500: boom"
        );

        let err = EventSourceError::from(RetryError::<ConnectError>::Cancelled);
        assert!(err.is_cancelled());
    }
}
