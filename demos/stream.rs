//! Streaming example.
//!
//! Connects to an event-stream endpoint twice: once with the push-based
//! client and once by handing a response that was already received to the
//! pull-based stream.
//!
//! Run with:
//! ```bash
//! RUST_LOG=info cargo run --example stream -- http://localhost:5000/events
//! ```

use futures::StreamExt;
use sse_client::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000/";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SSE_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    println!("Streaming from {url}\n");

    // Push-based: subscribers are called while the client runs.
    let options = ConnectionOptions::new()
        .header("Authorization", "Bearer test_token")
        .payload(r#"{"query": "test"}"#)
        .max_retries(3)
        .retry_delay(Duration::from_secs(2))
        .debug(true);

    let mut client = EventSourceClient::new(&url, options)?;
    client.on_event(|event| println!("[{}] {}", event.event_type, event.data));
    client.on_state_change(|state| println!("-- {state}"));

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    match client.stream(cancel.clone()).await {
        Ok(()) => println!("\nStream ended"),
        Err(err) if err.is_cancelled() => {
            println!("\nCancelled");
            return Ok(());
        }
        Err(err) => println!("\nStream failed: {err}"),
    }

    // Pull-based: the response is opened here, the client only reads it.
    let response = reqwest::get(&url).await?.error_for_status()?;
    let client = EventSourceClient::from_response(response, ConnectionOptions::new());

    let mut events = client.into_event_stream(cancel);
    let mut count = 0;
    while let Some(event) = events.next().await {
        match event {
            Ok(event) => {
                count += 1;
                println!("#{count} {}", event.data);
            }
            Err(err) => {
                println!("Stream failed: {err}");
                break;
            }
        }
    }

    println!("\nReceived {count} event(s)");
    Ok(())
}
