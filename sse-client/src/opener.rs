//! Connection opener: turns a [`ConnectionSource`] into a live body.

use crate::error::{EventSourceError, Result};
use crate::source::ConnectionSource;
use sse_client_core::{ByteStream, ConnectionOptions};
use sse_client_retries::{with_retry, ConnectRequest, RetryConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Open the byte stream for one streaming run.
///
/// Remote sources are retried per the options' attempt budget and delay.
/// Pre-opened sources hand over their body once; there is nothing to retry.
pub async fn open(
    source: &mut ConnectionSource,
    options: &ConnectionOptions,
    cancel: &CancellationToken,
) -> Result<ByteStream> {
    match source {
        ConnectionSource::Remote { url, connector } => {
            let request = ConnectRequest::from_options(url.clone(), options);
            let config = RetryConfig::from_options(options);
            let debug = options.debug;

            let body = with_retry(&config, cancel, |attempt| {
                let connector = Arc::clone(connector);
                let request = request.clone();
                async move {
                    if debug {
                        log_request(&request, attempt);
                    }
                    connector.connect(&request).await
                }
            })
            .await?;

            Ok(body)
        }
        ConnectionSource::Preopened { body } => {
            if cancel.is_cancelled() {
                return Err(EventSourceError::Cancelled);
            }
            body.take().ok_or_else(|| {
                EventSourceError::BodyRead("pre-opened body was already consumed".to_string())
            })
        }
    }
}

fn log_request(request: &ConnectRequest, attempt: u32) {
    let headers = request
        .headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ");

    info!(attempt, method = %request.method, "Request method");
    info!(attempt, url = %request.url, "Request URL");
    info!(attempt, headers = %headers, "Request headers");
    if let Some(payload) = &request.payload {
        info!(attempt, payload = %payload, "Request payload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sse_client_core::body::from_static;
    use sse_client_retries::{ConnectError, ConnectResult, Connector};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use url::Url;

    struct FlakyConnector {
        calls: AtomicU32,
        failures: u32,
    }

    #[async_trait]
    impl Connector for FlakyConnector {
        async fn connect(&self, _request: &ConnectRequest) -> ConnectResult<ByteStream> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(ConnectError::connection(format!("refused #{call}")))
            } else {
                Ok(from_static("data: ok\n\n"))
            }
        }
    }

    fn remote(failures: u32) -> (ConnectionSource, Arc<FlakyConnector>) {
        let connector = Arc::new(FlakyConnector {
            calls: AtomicU32::new(0),
            failures,
        });
        let source = ConnectionSource::remote(
            Url::parse("http://test.com/events").unwrap(),
            connector.clone(),
        );
        (source, connector)
    }

    fn options() -> ConnectionOptions {
        ConnectionOptions::new()
            .max_retries(3)
            .retry_delay(Duration::from_millis(5))
            .debug(true)
    }

    #[tokio::test]
    async fn test_all_attempts_fail_last_error_propagated() {
        let (mut source, connector) = remote(u32::MAX);
        let err = open(&mut source, &options(), &CancellationToken::new())
            .await
            .err()
            .unwrap();

        assert_eq!(connector.calls.load(Ordering::SeqCst), 3);
        match err {
            EventSourceError::Connect { attempts, source } => {
                assert_eq!(attempts, 3);
                assert_eq!(source.to_string(), "Connection error: refused #3");
            }
            other => panic!("expected connect error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nth_attempt_succeeds() {
        let (mut source, connector) = remote(1);
        assert!(open(&mut source, &options(), &CancellationToken::new())
            .await
            .is_ok());
        assert_eq!(connector.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preopened_body_taken_once() {
        let mut source = ConnectionSource::preopened(from_static("data: x\n\n"));
        let cancel = CancellationToken::new();

        assert!(open(&mut source, &options(), &cancel).await.is_ok());
        let err = open(&mut source, &options(), &cancel).await.err().unwrap();
        assert!(matches!(err, EventSourceError::BodyRead(_)));
    }

    #[tokio::test]
    async fn test_cancelled_remote_makes_no_attempt() {
        let (mut source, connector) = remote(0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = open(&mut source, &options(), &cancel).await.err().unwrap();
        assert!(err.is_cancelled());
        assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
    }
}
