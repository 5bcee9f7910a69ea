//! Pull-based view of a client run.

use crate::client::EventSourceClient;
use crate::error::Result;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use sse_client_core::DecodedEvent;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;

type Driver = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Stream of events produced by [`EventSourceClient::into_event_stream`].
///
/// Yields `Ok(event)` for every decoded event. If the run fails, the error is
/// the last item. Subscribers registered on the client before conversion keep
/// receiving notifications.
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Result<DecodedEvent>>,
    driver: Option<Driver>,
}

impl EventStream {
    pub(crate) fn new(mut client: EventSourceClient, cancel: CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded();

        let events = tx.clone();
        client.on_event(move |event| {
            let _ = events.unbounded_send(Ok(event.clone()));
        });

        let driver = async move {
            if let Err(err) = client.stream(cancel).await {
                let _ = tx.unbounded_send(Err(err));
            }
        };

        Self {
            rx,
            driver: Some(Box::pin(driver)),
        }
    }
}

impl Stream for EventStream {
    type Item = Result<DecodedEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Poll::Ready(item) = self.rx.poll_next_unpin(cx) {
                return Poll::Ready(item);
            }

            let Some(driver) = self.driver.as_mut() else {
                return Poll::Pending;
            };
            match driver.as_mut().poll(cx) {
                // The client and both senders are gone now; drain what is left.
                Poll::Ready(()) => self.driver = None,
                // The driver may have queued events before parking.
                Poll::Pending => {
                    return match self.rx.poll_next_unpin(cx) {
                        Poll::Ready(Some(item)) => Poll::Ready(Some(item)),
                        _ => Poll::Pending,
                    };
                }
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("running", &self.driver.is_some())
            .finish_non_exhaustive()
    }
}
