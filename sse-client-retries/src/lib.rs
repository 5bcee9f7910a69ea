//! # sse-client-retries
//!
//! Connection retries and HTTP transport for sse-client.
//!
//! Opening an event stream is the only step that is retried: each attempt
//! either yields a live response body or fails, and failures are retried
//! with a fixed delay until the attempt budget is spent.
//!
//! ## Core Concepts
//!
//! - **[`RetryConfig`]**: Attempt budget and fixed delay
//! - **[`with_retry`]**: Run attempts with cooperative cancellation
//! - **[`Connector`]**: One connection attempt, returning a
//!   [`ByteStream`](sse_client_core::ByteStream)
//! - **[`HttpConnector`]**: `reqwest`-backed connector
//!
//! ## Example
//!
//! ```ignore
//! use sse_client_retries::{with_retry, ConnectRequest, Connector, HttpConnector, RetryConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let connector = HttpConnector::new();
//! let request = ConnectRequest::from_options(url, &options);
//! let config = RetryConfig::from_options(&options);
//!
//! let cancel = CancellationToken::new();
//! let body = with_retry(&config, &cancel, |_| connector.connect(&request)).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod executor;
pub mod transport;

// Re-exports
pub use config::RetryConfig;
pub use error::{ConnectError, ConnectResult, RetryError};
pub use executor::{with_retry, with_retry_state, AttemptInfo, RetryState};
pub use transport::{
    response_body, ConnectRequest, Connector, HttpConnector, PAYLOAD_CONTENT_TYPE,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        with_retry, ConnectError, ConnectRequest, Connector, HttpConnector, RetryConfig,
        RetryError,
    };
}
