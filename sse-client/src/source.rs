//! Where a client gets its byte stream from.

use sse_client_core::ByteStream;
use sse_client_retries::Connector;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Connection source of an [`EventSourceClient`](crate::EventSourceClient).
pub enum ConnectionSource {
    /// Open a new connection per run through `connector`.
    Remote {
        /// Target URL.
        url: Url,
        /// Transport used for each connection attempt.
        connector: Arc<dyn Connector>,
    },
    /// Read a body the caller already opened. Consumed by the first run.
    Preopened {
        /// The body, until a run takes it.
        body: Option<ByteStream>,
    },
}

impl ConnectionSource {
    /// Remote source over `connector`.
    pub fn remote(url: Url, connector: Arc<dyn Connector>) -> Self {
        Self::Remote { url, connector }
    }

    /// Pre-opened source over `body`.
    pub fn preopened(body: ByteStream) -> Self {
        Self::Preopened { body: Some(body) }
    }

    /// Whether this source wraps a pre-opened body.
    pub fn is_preopened(&self) -> bool {
        matches!(self, Self::Preopened { .. })
    }
}

impl fmt::Debug for ConnectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { url, .. } => f
                .debug_struct("Remote")
                .field("url", &url.as_str())
                .finish_non_exhaustive(),
            Self::Preopened { body } => f
                .debug_struct("Preopened")
                .field("consumed", &body.is_none())
                .finish(),
        }
    }
}
