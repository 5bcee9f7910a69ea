//! Error types shared across the workspace.

use thiserror::Error;

/// Failure reported by an event subscriber.
///
/// Subscriber failures are logged by the client and never change its
/// control flow.
#[derive(Debug, Error)]
#[error("subscriber failed: {message}")]
pub struct SubscriberError {
    /// Description of the failure.
    pub message: String,
}

impl SubscriberError {
    /// Create a new subscriber error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build from a caught panic payload.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "subscriber panicked".to_string()
        };
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SubscriberError::new("boom");
        assert_eq!(err.to_string(), "subscriber failed: boom");
    }

    #[test]
    fn test_from_panic_payload() {
        let payload = std::panic::catch_unwind(|| panic!("kaboom")).unwrap_err();
        assert_eq!(SubscriberError::from_panic(payload.as_ref()).message, "kaboom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(
            SubscriberError::from_panic(payload.as_ref()).message,
            "subscriber panicked"
        );
    }
}
