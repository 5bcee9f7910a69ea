//! Decoding errors.

use thiserror::Error;

/// Errors that can occur while decoding an event stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Reading the underlying body failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single line grew past the buffer limit without a terminator.
    #[error("Line exceeds {limit} bytes without a terminator")]
    LineTooLong {
        /// The limit that was exceeded.
        limit: usize,
    },
}

/// Result type for decoding operations.
pub type StreamResult<T> = Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StreamError::LineTooLong { limit: 8 };
        assert_eq!(err.to_string(), "Line exceeds 8 bytes without a terminator");

        let err = StreamError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ));
        assert_eq!(err.to_string(), "IO error: reset");
    }
}
