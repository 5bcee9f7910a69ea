//! Event and state-change subscribers.
//!
//! Subscribers are called synchronously, in registration order, from the
//! task running the stream. A subscriber that returns an error or panics is
//! logged and skipped; it never changes the client's control flow.

use sse_client_core::{DecodedEvent, ReadyState, SubscriberError};
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// Receives decoded events and state transitions.
pub trait Subscriber: Send + Sync {
    /// Called for every decoded event.
    fn on_event(&self, _event: &DecodedEvent) -> Result<(), SubscriberError> {
        Ok(())
    }

    /// Called for every state transition.
    fn on_state_change(&self, _state: ReadyState) -> Result<(), SubscriberError> {
        Ok(())
    }
}

/// Subscriber that forwards events to a closure.
pub struct EventFn<F>(pub F);

impl<F> Subscriber for EventFn<F>
where
    F: Fn(&DecodedEvent) + Send + Sync,
{
    fn on_event(&self, event: &DecodedEvent) -> Result<(), SubscriberError> {
        (self.0)(event);
        Ok(())
    }
}

/// Subscriber that forwards state transitions to a closure.
pub struct StateFn<F>(pub F);

impl<F> Subscriber for StateFn<F>
where
    F: Fn(ReadyState) + Send + Sync,
{
    fn on_state_change(&self, state: ReadyState) -> Result<(), SubscriberError> {
        (self.0)(state);
        Ok(())
    }
}

/// Ordered set of subscribers.
#[derive(Default)]
pub struct Subscribers {
    entries: Vec<Box<dyn Subscriber>>,
}

impl Subscribers {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber.
    pub fn push(&mut self, subscriber: impl Subscriber + 'static) {
        self.entries.push(Box::new(subscriber));
    }

    /// Deliver an event to every subscriber.
    pub fn emit_event(&self, event: &DecodedEvent) {
        for (index, subscriber) in self.entries.iter().enumerate() {
            isolate(index, "event", || subscriber.on_event(event));
        }
    }

    /// Deliver a state transition to every subscriber.
    pub fn emit_state(&self, state: ReadyState) {
        for (index, subscriber) in self.entries.iter().enumerate() {
            isolate(index, "state", || subscriber.on_state_change(state));
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.entries.len())
            .finish()
    }
}

fn isolate(index: usize, kind: &'static str, call: impl FnOnce() -> Result<(), SubscriberError>) {
    let error = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => return,
        Ok(Err(error)) => error,
        Err(payload) => SubscriberError::from_panic(payload.as_ref()),
    };
    warn!(subscriber = index, kind, error = %error, "Subscriber failed");
}
