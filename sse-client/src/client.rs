//! The event source client and its lifecycle driver.

use crate::error::{EventSourceError, Result};
use crate::event_stream::EventStream;
use crate::opener;
use crate::source::ConnectionSource;
use crate::subscriber::{EventFn, StateFn, Subscriber, Subscribers};
use futures::StreamExt;
use sse_client_core::{ByteStream, ConnectionOptions, DecodedEvent, ReadyState};
use sse_client_retries::{response_body, Connector, HttpConnector};
use sse_client_streaming::decode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use url::Url;

/// Client for a `text/event-stream` endpoint.
///
/// Register subscribers, then call [`stream`](Self::stream). Each call runs
/// `Connecting -> Open -> Closed` (or `Connecting -> Closed` when the
/// connection cannot be opened) and delivers every decoded event in between.
///
/// `stream` takes `&mut self`, so one instance can never run two streams at
/// once.
///
/// # Example
///
/// ```ignore
/// use sse_client::prelude::*;
///
/// let mut client = EventSourceClient::new(
///     "http://localhost:5000/events",
///     ConnectionOptions::new().header("Authorization", "Bearer token"),
/// )?;
/// client.on_event(|event| println!("{}", event.data));
/// client.on_state_change(|state| println!("state: {state}"));
/// client.stream(CancellationToken::new()).await?;
/// ```
#[derive(Debug)]
pub struct EventSourceClient {
    options: ConnectionOptions,
    source: ConnectionSource,
    lifecycle: Lifecycle,
}

impl EventSourceClient {
    /// Create a client for `url` using a default HTTP transport.
    pub fn new(url: &str, options: ConnectionOptions) -> Result<Self> {
        Self::with_connector(url, Arc::new(HttpConnector::new()), options)
    }

    /// Create a client for `url` using an existing `reqwest` client.
    pub fn with_http_client(
        url: &str,
        client: reqwest::Client,
        options: ConnectionOptions,
    ) -> Result<Self> {
        Self::with_connector(url, Arc::new(HttpConnector::with_client(client)), options)
    }

    /// Create a client for `url` using a custom transport.
    pub fn with_connector(
        url: &str,
        connector: Arc<dyn Connector>,
        options: ConnectionOptions,
    ) -> Result<Self> {
        let url = Url::parse(url)?;
        Ok(Self::from_source(
            ConnectionSource::remote(url, connector),
            options,
        ))
    }

    /// Create a client that reads an already opened body.
    ///
    /// No request is made and nothing is retried. The body is consumed by the
    /// first call to [`stream`](Self::stream).
    pub fn from_body(body: ByteStream, options: ConnectionOptions) -> Self {
        Self::from_source(ConnectionSource::preopened(body), options)
    }

    /// Create a client that reads the body of an already received response.
    pub fn from_response(response: reqwest::Response, options: ConnectionOptions) -> Self {
        Self::from_body(response_body(response), options)
    }

    /// Create a client from an explicit source.
    pub fn from_source(source: ConnectionSource, options: ConnectionOptions) -> Self {
        let debug = options.debug;
        Self {
            options,
            source,
            lifecycle: Lifecycle::new(debug),
        }
    }

    /// Register a subscriber.
    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) -> &mut Self {
        self.lifecycle.subscribers.push(subscriber);
        self
    }

    /// Register a closure called for every decoded event.
    pub fn on_event<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&DecodedEvent) + Send + Sync + 'static,
    {
        self.subscribe(EventFn(f))
    }

    /// Register a closure called for every state transition.
    pub fn on_state_change<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(ReadyState) + Send + Sync + 'static,
    {
        self.subscribe(StateFn(f))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReadyState {
        self.lifecycle.state
    }

    /// Connection options.
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Whether this client reads a pre-opened body.
    pub fn is_preopened(&self) -> bool {
        self.source.is_preopened()
    }

    /// Connect and deliver events until the stream ends or `cancel` fires.
    ///
    /// The state always ends at `Closed`, including when connecting fails,
    /// reading fails, `cancel` fires, or this future is dropped.
    ///
    /// # Errors
    ///
    /// - [`EventSourceError::Connect`] when every connection attempt fails
    /// - [`EventSourceError::BodyRead`] when a pre-opened body was already consumed
    /// - [`EventSourceError::Read`] when reading the open stream fails
    /// - [`EventSourceError::Cancelled`] when `cancel` fires
    pub async fn stream(&mut self, cancel: CancellationToken) -> Result<()> {
        let debug = self.options.debug;
        if debug {
            info!("Starting to stream events");
        }

        let mut lifecycle = CloseOnDrop(&mut self.lifecycle);
        lifecycle.0.set_state(ReadyState::Connecting);

        let result = run(&mut self.source, &self.options, &cancel, &mut *lifecycle.0).await;

        if let Err(err) = &result {
            if debug {
                error!(error = %err, "An error occurred while streaming");
            }
        }
        drop(lifecycle);

        if debug {
            info!("Streaming has ended");
        }
        result
    }

    /// Turn this client into a pull-based stream of events.
    ///
    /// The returned stream drives [`stream`](Self::stream) as it is polled.
    /// A terminal error, including [`EventSourceError::Cancelled`], is
    /// yielded as the last item. Dropping the stream stops the run.
    pub fn into_event_stream(self, cancel: CancellationToken) -> EventStream {
        EventStream::new(self, cancel)
    }
}

async fn run(
    source: &mut ConnectionSource,
    options: &ConnectionOptions,
    cancel: &CancellationToken,
    lifecycle: &mut Lifecycle,
) -> Result<()> {
    let body = opener::open(source, options, cancel).await?;
    lifecycle.set_state(ReadyState::Open);

    let mut events = decode(body, cancel.clone());
    while let Some(event) = events.next().await {
        let event = event?;
        if options.debug {
            info!(data = %event.data, "Raw event data");
            info!(event_type = %event.event_type, "Event received");
        }
        lifecycle.subscribers.emit_event(&event);
    }

    if cancel.is_cancelled() {
        return Err(EventSourceError::Cancelled);
    }
    Ok(())
}

/// State and subscribers, kept apart from the source so the close guard can
/// hold them while the source is borrowed by the run.
#[derive(Debug)]
struct Lifecycle {
    state: ReadyState,
    subscribers: Subscribers,
    debug: bool,
}

impl Lifecycle {
    fn new(debug: bool) -> Self {
        Self {
            state: ReadyState::Initializing,
            subscribers: Subscribers::new(),
            debug,
        }
    }

    fn set_state(&mut self, state: ReadyState) {
        // A run only moves forward; a new run starts over at Connecting.
        debug_assert!(
            state == ReadyState::Connecting || self.state.can_advance_to(state),
            "invalid transition {} -> {}",
            self.state,
            state
        );
        debug!(from = %self.state, to = %state, "State changed");
        if self.debug {
            info!(state = %state, "Ready state");
        }
        self.state = state;
        self.subscribers.emit_state(state);
    }
}

/// Moves the lifecycle to `Closed` on every exit path.
struct CloseOnDrop<'a>(&'a mut Lifecycle);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set_state(ReadyState::Closed);
    }
}
