//! # sse-client-streaming
//!
//! Line-oriented `text/event-stream` decoding for sse-client.
//!
//! Only the `data:` field is interpreted. Consecutive `data:` lines form a
//! block, and a blank (or whitespace-only) line turns the block into a
//! [`DecodedEvent`](sse_client_core::DecodedEvent) of type `"message"`.
//!
//! ## Core Concepts
//!
//! - **[`LineBuffer`]**: Split byte chunks into lines
//! - **[`LineDecoder`]**: Accumulate `data:` lines into events
//! - **[`EventDecoder`]**: Lazy, cancellable stream of events over a body
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use sse_client_streaming::decode;
//! use tokio_util::sync::CancellationToken;
//!
//! let mut events = decode(body, CancellationToken::new());
//! while let Some(event) = events.next().await {
//!     println!("{}", event?.data);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod decoder;
pub mod error;
pub mod event_stream;

// Re-exports
pub use decoder::{LineBuffer, LineDecoder, DATA_PREFIX, MAX_LINE_LENGTH};
pub use error::{StreamError, StreamResult};
pub use event_stream::{decode, EventDecoder};
