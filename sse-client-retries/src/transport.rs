//! HTTP transport for opening event streams.

use crate::error::{ConnectError, ConnectResult};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use sse_client_core::{byte_stream, ByteStream, ConnectionOptions};
use std::io;
use url::Url;

/// Content type attached to every non-empty payload.
pub const PAYLOAD_CONTENT_TYPE: &str = "application/json; charset=utf-8";

impl From<reqwest::Error> for ConnectError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConnectError::Timeout
        } else if err.is_connect() {
            ConnectError::Connection(err.to_string())
        } else if err.is_builder() {
            ConnectError::Request(err.to_string())
        } else {
            ConnectError::Other(err.into())
        }
    }
}

/// Everything needed to issue one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    /// Target URL.
    pub url: Url,
    /// HTTP method.
    pub method: String,
    /// Headers to send, already stripped of `Content-Type`.
    pub headers: Vec<(String, String)>,
    /// JSON payload, if any.
    pub payload: Option<String>,
}

impl ConnectRequest {
    /// Build the request described by `options` for `url`.
    pub fn from_options(url: Url, options: &ConnectionOptions) -> Self {
        Self {
            url,
            method: options.effective_method().to_string(),
            headers: options
                .request_headers()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            payload: options.has_payload().then(|| options.payload.clone()),
        }
    }
}

/// Opens a live byte stream for a request.
///
/// One call is one attempt; retrying is the caller's concern.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Send `request` and return the response body once headers arrive.
    async fn connect(&self, request: &ConnectRequest) -> ConnectResult<ByteStream>;
}

/// [`Connector`] backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    client: Client,
}

impl HttpConnector {
    /// Create a connector with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, request: &ConnectRequest) -> ConnectResult<ByteStream> {
        let method = parse_method(&request.method)?;

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(payload) = &request.payload {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static(PAYLOAD_CONTENT_TYPE))
                .body(payload.clone());
        }

        // `send` resolves once headers are read; the body stays unread.
        let response = builder.send().await?;
        let response = check_response(response).await?;

        Ok(response_body(response))
    }
}

fn parse_method(method: &str) -> ConnectResult<Method> {
    Method::from_bytes(method.as_bytes())
        .map_err(|e| ConnectError::Request(format!("invalid method {method:?}: {e}")))
}

/// Check an HTTP response and convert to [`ConnectError`] if needed.
async fn check_response(response: Response) -> ConnectResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ConnectError::Http { status, body })
}

/// Expose a response body as a [`ByteStream`].
pub fn response_body(response: Response) -> ByteStream {
    byte_stream(
        response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| io::Error::new(io::ErrorKind::Other, e))),
    )
}
