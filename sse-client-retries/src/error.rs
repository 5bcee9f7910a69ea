//! Connection and retry error types.

use thiserror::Error;

/// A single failed connection attempt.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The server answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Timeout.
    #[error("Timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request could not be built (bad method, header or URL).
    #[error("Invalid request: {0}")]
    Request(String),

    /// Other error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ConnectError {
    /// Create an HTTP status error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Get the HTTP status if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for a single connection attempt.
pub type ConnectResult<T> = Result<T, ConnectError>;

/// Outcome of a retried operation that did not succeed.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed; `last` is the final attempt's error.
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        last: E,
    },

    /// Cancellation was observed before an attempt succeeded.
    #[error("cancelled")]
    Cancelled,
}

impl<E> RetryError<E> {
    /// Whether the operation was cancelled rather than exhausted.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The final attempt's error, if attempts were exhausted.
    pub fn into_last(self) -> Option<E> {
        match self {
            Self::Exhausted { last, .. } => Some(last),
            Self::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let err = ConnectError::http(503, "unavailable");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP error 503: unavailable");

        assert_eq!(ConnectError::Timeout.status(), None);
    }

    #[test]
    fn test_retry_error_display() {
        let err = RetryError::Exhausted {
            attempts: 3,
            last: ConnectError::connection("refused"),
        };
        assert_eq!(
            err.to_string(),
            "gave up after 3 attempt(s): Connection error: refused"
        );
        assert!(!err.is_cancelled());
        assert!(matches!(err.into_last(), Some(ConnectError::Connection(_))));

        let err: RetryError<ConnectError> = RetryError::Cancelled;
        assert!(err.is_cancelled());
        assert!(err.into_last().is_none());
    }
}
