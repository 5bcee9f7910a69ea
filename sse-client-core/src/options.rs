//! Connection options.
//!
//! This module provides the `ConnectionOptions` type describing how a client
//! connects: request headers, payload, method, retry budget and diagnostics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of connection attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay between connection attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Header name that callers cannot override; the payload content type is fixed.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Options controlling how an event source connects.
///
/// Unset fields take their defaults: no headers, empty payload, method
/// resolved from the payload, debug off, three attempts two seconds apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// Request headers, sent in insertion order.
    pub headers: IndexMap<String, String>,

    /// Request body. Empty means no body is sent.
    pub payload: String,

    /// Explicit HTTP method. See [`ConnectionOptions::effective_method`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Emit diagnostic records for requests, payloads and errors.
    pub debug: bool,

    /// Total number of connection attempts, including the first.
    pub max_retries: u32,

    /// Fixed delay between connection attempts.
    #[serde(with = "duration_ms_serde")]
    pub retry_delay: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            headers: IndexMap::new(),
            payload: String::new(),
            method: None,
            debug: false,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl ConnectionOptions {
    /// Create options with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all headers.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Set the request payload.
    #[must_use]
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Set the HTTP method explicitly.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Enable or disable diagnostic records.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the total number of connection attempts. Values below 1 become 1.
    #[must_use]
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.max_retries = attempts.max(1);
        self
    }

    /// Set the delay between connection attempts.
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Number of connection attempts to make. Always at least 1.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Whether a request body will be sent.
    pub fn has_payload(&self) -> bool {
        !self.payload.is_empty()
    }

    /// The method to use: the explicit one, else `POST` with a payload, else `GET`.
    pub fn effective_method(&self) -> &str {
        match self.method.as_deref() {
            Some(method) if !method.trim().is_empty() => method,
            _ if self.has_payload() => "POST",
            _ => "GET",
        }
    }

    /// Headers that will actually be sent, skipping any `Content-Type` entry.
    pub fn request_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .filter(|(name, _)| !is_content_type(name))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Whether a header name is `Content-Type` (HTTP header names are case-insensitive).
pub fn is_content_type(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(CONTENT_TYPE_HEADER)
}

mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let options = ConnectionOptions::new();
        assert!(options.headers.is_empty());
        assert!(options.payload.is_empty());
        assert_eq!(options.method, None);
        assert!(!options.debug);
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.retry_delay, Duration::from_secs(2));
    }

    #[rstest]
    #[case(None, "", "GET")]
    #[case(None, "{\"q\":1}", "POST")]
    #[case(Some("PUT"), "{\"q\":1}", "PUT")]
    #[case(Some("GET"), "", "GET")]
    #[case(Some(""), "body", "POST")]
    fn test_effective_method(
        #[case] method: Option<&str>,
        #[case] payload: &str,
        #[case] expected: &str,
    ) {
        let mut options = ConnectionOptions::new().payload(payload);
        if let Some(m) = method {
            options = options.method(m);
        }
        assert_eq!(options.effective_method(), expected);
    }

    #[test]
    fn test_max_retries_clamped() {
        let options = ConnectionOptions::new().max_retries(0);
        assert_eq!(options.max_retries, 1);
        assert_eq!(options.attempts(), 1);

        let mut raw = ConnectionOptions::new();
        raw.max_retries = 0;
        assert_eq!(raw.attempts(), 1);
    }

    #[test]
    fn test_request_headers_skip_content_type() {
        let options = ConnectionOptions::new()
            .header("Authorization", "Bearer token")
            .header("Content-Type", "text/plain")
            .header("content-type", "text/html")
            .header("X-Trace", "abc");

        let sent: Vec<_> = options.request_headers().collect();
        assert_eq!(
            sent,
            vec![("Authorization", "Bearer token"), ("X-Trace", "abc")]
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ConnectionOptions =
            serde_json::from_str(r#"{"payload": "{}", "retry_delay": 250}"#).unwrap();

        assert_eq!(options.payload, "{}");
        assert_eq!(options.retry_delay, Duration::from_millis(250));
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.effective_method(), "POST");
    }

    #[test]
    fn test_serialize_skips_unset_method() {
        let json = serde_json::to_value(ConnectionOptions::new()).unwrap();
        assert!(json.get("method").is_none());
        assert_eq!(json["retry_delay"], 2000);
    }
}
