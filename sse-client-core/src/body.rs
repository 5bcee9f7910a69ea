//! Byte-stream abstraction for response bodies.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::io;
use std::pin::Pin;

/// A live, incrementally readable response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>;

/// Box any compatible chunk stream into a [`ByteStream`].
pub fn byte_stream<S, B>(inner: S) -> ByteStream
where
    S: Stream<Item = io::Result<B>> + Send + 'static,
    B: Into<Bytes>,
{
    Box::pin(inner.map(|chunk| chunk.map(Into::into)))
}

/// A [`ByteStream`] that yields one fixed body.
pub fn from_static(body: &'static str) -> ByteStream {
    Box::pin(stream::once(async move {
        Ok::<_, io::Error>(Bytes::from_static(body.as_bytes()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_byte_stream_preserves_chunks() {
        let chunks = vec![Ok::<_, io::Error>("data: a\n"), Ok("\n")];
        let collected: Vec<_> = byte_stream(stream::iter(chunks))
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert_eq!(collected, vec![Bytes::from("data: a\n"), Bytes::from("\n")]);
    }

    #[tokio::test]
    async fn test_from_static() {
        let mut body = from_static("data: x\n\n");
        let chunk = body.next().await.unwrap().unwrap();
        assert_eq!(chunk, Bytes::from_static(b"data: x\n\n"));
        assert!(body.next().await.is_none());
    }
}
