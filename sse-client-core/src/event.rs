//! Decoded events.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Event type assigned to every event produced from `data:` lines.
pub const MESSAGE_EVENT_TYPE: &str = "message";

/// An event decoded from one blank-line-terminated block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedEvent {
    /// Event type. Always `"message"` for decoded blocks.
    pub event_type: String,
    /// The block's `data:` line bodies joined by newlines.
    pub data: String,
    /// Event ID (if specified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Reconnection hint in milliseconds (if specified).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_hint: Option<u64>,
}

impl DecodedEvent {
    /// Create a `"message"` event with the given data.
    pub fn message(data: impl Into<String>) -> Self {
        Self {
            event_type: MESSAGE_EVENT_TYPE.to_string(),
            data: data.into(),
            id: None,
            retry_hint: None,
        }
    }

    /// Set the event ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the reconnection hint.
    #[must_use]
    pub fn with_retry_hint(mut self, millis: u64) -> Self {
        self.retry_hint = Some(millis);
        self
    }

    /// Parse the data as JSON.
    pub fn parse_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_event() {
        let event = DecodedEvent::message("hello");
        assert_eq!(event.event_type, "message");
        assert_eq!(event.data, "hello");
        assert!(event.id.is_none());
        assert!(event.retry_hint.is_none());
    }

    #[test]
    fn test_parse_data() {
        let event = DecodedEvent::message(r#"{"message": "Hello"}"#);
        let parsed: serde_json::Value = event.parse_data().unwrap();
        assert_eq!(parsed["message"], "Hello");

        let event = DecodedEvent::message("not json");
        assert!(event.parse_data::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_serialize_skips_reserved_fields() {
        let json = serde_json::to_value(DecodedEvent::message("x")).unwrap();
        assert_eq!(json, serde_json::json!({"event_type": "message", "data": "x"}));

        let json = serde_json::to_value(DecodedEvent::message("x").with_id("7").with_retry_hint(10))
            .unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["retry_hint"], 10);
    }
}
