//! Retry executor for running connection attempts with cancellation.

use crate::config::RetryConfig;
use crate::error::RetryError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// State of a retry run.
#[derive(Debug, Clone, Default)]
pub struct RetryState {
    /// Current attempt number (1-indexed).
    pub attempt: u32,
    /// Last error message.
    pub last_error: Option<String>,
    /// Total time spent waiting.
    pub total_wait_time: Duration,
    /// History of attempts.
    pub history: Vec<AttemptInfo>,
}

/// Information about a single attempt.
#[derive(Debug, Clone)]
pub struct AttemptInfo {
    /// Attempt number.
    pub attempt: u32,
    /// Whether it succeeded.
    pub success: bool,
    /// Error message if failed.
    pub error: Option<String>,
    /// Time waited after this attempt.
    pub wait_time: Duration,
}

/// Execute an operation with retries.
///
/// `operation` receives the 1-indexed attempt number. Cancellation is checked
/// before each attempt and raced against both the attempt and the delay.
///
/// # Example
///
/// ```ignore
/// use sse_client_retries::{with_retry, RetryConfig};
/// use tokio_util::sync::CancellationToken;
///
/// let config = RetryConfig::new().max_attempts(3);
/// let cancel = CancellationToken::new();
/// let body = with_retry(&config, &cancel, |_| connector.connect(&request)).await?;
/// ```
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    with_retry_state(config, cancel, operation).await.0
}

/// Execute with retries and get state information.
pub async fn with_retry_state<F, Fut, T, E>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> (Result<T, RetryError<E>>, RetryState)
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut state = RetryState::default();
    let max_attempts = config.max_attempts.max(1);

    loop {
        if cancel.is_cancelled() {
            return (Err(RetryError::Cancelled), state);
        }

        state.attempt += 1;

        debug!(
            attempt = state.attempt,
            max_attempts, "Executing connection attempt"
        );

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = operation(state.attempt) => Some(result),
        };
        let Some(outcome) = outcome else {
            return (Err(RetryError::Cancelled), state);
        };

        match outcome {
            Ok(result) => {
                state.history.push(AttemptInfo {
                    attempt: state.attempt,
                    success: true,
                    error: None,
                    wait_time: Duration::ZERO,
                });
                return (Ok(result), state);
            }
            Err(err) => {
                let message = err.to_string();
                let wait = config.wait_after(state.attempt);

                state.history.push(AttemptInfo {
                    attempt: state.attempt,
                    success: false,
                    error: Some(message.clone()),
                    wait_time: wait.unwrap_or_default(),
                });
                state.last_error = Some(message.clone());

                let Some(wait) = wait else {
                    error!(
                        attempts = state.attempt,
                        error = %message,
                        "Connection attempts exhausted"
                    );
                    return (
                        Err(RetryError::Exhausted {
                            attempts: state.attempt,
                            last: err,
                        }),
                        state,
                    );
                };

                warn!(
                    attempt = state.attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %message,
                    "Connection attempt failed, retrying"
                );

                state.total_wait_time += wait;

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return (Err(RetryError::Cancelled), state),
                    _ = sleep(wait) => {}
                }
            }
        }
    }
}
