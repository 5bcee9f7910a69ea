//! # sse-client-core
//!
//! Core types for the sse-client Server-Sent Events client.
//!
//! This crate provides the data model shared by the rest of the workspace:
//!
//! - **Options**: [`ConnectionOptions`] with headers, payload, method and retry budget
//! - **Events**: [`DecodedEvent`] produced for each terminated `data:` block
//! - **State**: [`ReadyState`] lifecycle phases
//! - **Bodies**: [`ByteStream`], the live response body abstraction
//! - **Errors**: [`SubscriberError`] reported by event subscribers
//!
//! ## Example
//!
//! ```rust
//! use sse_client_core::{ConnectionOptions, ReadyState};
//! use std::time::Duration;
//!
//! let options = ConnectionOptions::new()
//!     .header("Authorization", "Bearer token")
//!     .payload(r#"{"query": "test"}"#)
//!     .max_retries(5)
//!     .retry_delay(Duration::from_millis(500));
//!
//! assert_eq!(options.effective_method(), "POST");
//! assert_eq!(ReadyState::default(), ReadyState::Initializing);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod body;
pub mod errors;
pub mod event;
pub mod options;
pub mod state;

// Re-exports for convenience
pub use body::{byte_stream, ByteStream};
pub use errors::SubscriberError;
pub use event::{DecodedEvent, MESSAGE_EVENT_TYPE};
pub use options::{
    is_content_type, ConnectionOptions, CONTENT_TYPE_HEADER, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_DELAY,
};
pub use state::ReadyState;
