//! Streaming adapter from a response body to decoded events.

use crate::decoder::{LineBuffer, LineDecoder};
use crate::error::{StreamError, StreamResult};
use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use sse_client_core::DecodedEvent;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::debug;

/// Decode a byte stream into events, stopping early when `cancel` fires.
///
/// The returned stream is lazy: it reads from `body` only as events are
/// pulled, so unbounded bodies are consumed incrementally. It ends when the
/// body ends or when cancellation is observed; in both cases a block that
/// was not terminated by a blank line is dropped.
pub fn decode<S>(body: S, cancel: CancellationToken) -> EventDecoder<S>
where
    S: Stream<Item = std::io::Result<Bytes>>,
{
    EventDecoder::new(body, cancel)
}

pin_project! {
    /// Stream adapter that decodes `data:` blocks from a byte stream.
    pub struct EventDecoder<S> {
        #[pin]
        inner: S,
        cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
        buffer: LineBuffer,
        decoder: LineDecoder,
        lines: VecDeque<String>,
        eof: bool,
        finished: bool,
    }
}

impl<S> EventDecoder<S>
where
    S: Stream<Item = std::io::Result<Bytes>>,
{
    /// Create a decoder over `inner` that stops when `cancel` fires.
    pub fn new(inner: S, cancel: CancellationToken) -> Self {
        Self {
            inner,
            cancelled: Box::pin(cancel.cancelled_owned()),
            buffer: LineBuffer::new(),
            decoder: LineDecoder::new(),
            lines: VecDeque::new(),
            eof: false,
            finished: false,
        }
    }

    /// Create a decoder that only stops at end of input.
    pub fn uncancellable(inner: S) -> Self {
        Self::new(inner, CancellationToken::new())
    }

    /// Whether the stream has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<S> Stream for EventDecoder<S>
where
    S: Stream<Item = std::io::Result<Bytes>>,
{
    type Item = StreamResult<DecodedEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.finished {
                return Poll::Ready(None);
            }

            // Checked before every line so a burst of buffered lines still
            // observes cancellation promptly.
            if this.cancelled.as_mut().poll(cx).is_ready() {
                if this.decoder.has_pending() {
                    debug!("Discarding unterminated block on cancellation");
                }
                this.decoder.discard();
                this.lines.clear();
                *this.finished = true;
                return Poll::Ready(None);
            }

            if let Some(line) = this.lines.pop_front() {
                if let Some(event) = this.decoder.push_line(&line) {
                    return Poll::Ready(Some(Ok(event)));
                }
                continue;
            }

            if *this.eof {
                if this.decoder.has_pending() {
                    debug!("Stream ended with an unterminated block; not emitting it");
                }
                this.decoder.discard();
                *this.finished = true;
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    if let Err(error) = this.buffer.feed(&chunk, this.lines) {
                        *this.finished = true;
                        return Poll::Ready(Some(Err(error)));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(StreamError::Io(e))));
                }
                Poll::Ready(None) => {
                    this.buffer.finish(this.lines);
                    *this.eof = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
