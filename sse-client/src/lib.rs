//! # sse-client - Server-Sent Events client for Rust
//!
//! Connects to a `text/event-stream` endpoint, retries the connection with a
//! fixed delay, decodes `data:` blocks from the body as it arrives, and
//! notifies subscribers of events and lifecycle transitions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sse_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = ConnectionOptions::new()
//!         .header("Authorization", "Bearer token")
//!         .payload(r#"{"query": "test"}"#);
//!
//!     let mut client = EventSourceClient::new("http://localhost:5000/events", options)?;
//!     client.on_event(|event| println!("{}: {}", event.event_type, event.data));
//!     client.on_state_change(|state| println!("state: {state}"));
//!
//!     client.stream(CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pull-based consumption
//!
//! ```ignore
//! use futures::StreamExt;
//! use sse_client::prelude::*;
//!
//! let response = reqwest::get("http://localhost:5000/events").await?;
//! let client = EventSourceClient::from_response(response, ConnectionOptions::new());
//!
//! let mut events = client.into_event_stream(CancellationToken::new());
//! while let Some(event) = events.next().await {
//!     println!("{}", event?.data);
//! }
//! ```
//!
//! ## Lifecycle
//!
//! Every call to [`EventSourceClient::stream`] moves through
//! `Connecting -> Open -> Closed`. When the connection cannot be opened the
//! run goes straight from `Connecting` to `Closed`. Only opening the
//! connection is retried; a failure while reading an open stream ends the run.
//!
//! ## Architecture
//!
//! - [`sse_client_core`]: options, events, states, byte bodies
//! - [`sse_client_streaming`]: line splitting and `data:` block decoding
//! - [`sse_client_retries`]: retry executor and HTTP transport
//! - this crate: the client, its subscribers and the pull-based stream

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;
pub mod error;
pub mod event_stream;
pub mod opener;
pub mod source;
pub mod subscriber;

pub use client::EventSourceClient;
pub use error::{EventSourceError, Result};
pub use event_stream::EventStream;
pub use source::ConnectionSource;
pub use subscriber::{EventFn, StateFn, Subscriber, Subscribers};

pub use sse_client_core::{
    byte_stream, ByteStream, ConnectionOptions, DecodedEvent, ReadyState, SubscriberError,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, MESSAGE_EVENT_TYPE,
};
pub use sse_client_retries::{ConnectError, ConnectRequest, Connector, HttpConnector};
pub use sse_client_streaming::{decode, EventDecoder, LineDecoder, StreamError};
pub use tokio_util::sync::CancellationToken;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        CancellationToken, ConnectionOptions, DecodedEvent, EventSourceClient, EventSourceError,
        EventStream, ReadyState, Subscriber,
    };
}
