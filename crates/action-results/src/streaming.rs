// File: src/streaming.rs
// Purpose: A sink that hands the head to axum as soon as the response starts and streams the body

use axum::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use std::io;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;

use crate::error::ResultError;
use crate::sink::ResponseSink;

type Chunk = Result<Bytes, io::Error>;

/// Sink half of a streamed response. Lives on the task executing the result.
pub struct StreamingSink {
    status: StatusCode,
    headers: HeaderMap,
    head: Option<oneshot::Sender<(StatusCode, HeaderMap)>>,
    body: mpsc::Sender<Chunk>,
}

/// Receiving half, held by the request handler until the head arrives.
pub struct PendingResponse {
    head: oneshot::Receiver<(StatusCode, HeaderMap)>,
    body: mpsc::Receiver<Chunk>,
}

impl StreamingSink {
    /// Create a connected sink/response pair. `buffer` bounds the number of
    /// chunks in flight before writes wait on the client.
    pub fn channel(buffer: usize) -> (StreamingSink, PendingResponse) {
        let (head_tx, head_rx) = oneshot::channel();
        let (body_tx, body_rx) = mpsc::channel(buffer.max(1));
        let sink = StreamingSink {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            head: Some(head_tx),
            body: body_tx,
        };
        let pending = PendingResponse {
            head: head_rx,
            body: body_rx,
        };
        (sink, pending)
    }

    /// Terminate the body stream with an error so the transport drops the
    /// connection rather than presenting a truncated body as complete.
    pub async fn abort(&mut self, reason: &ResultError) {
        let err = io::Error::new(io::ErrorKind::Other, reason.to_string());
        let _ = self.body.send(Err(err)).await;
    }

    fn start(&mut self) -> Result<(), ResultError> {
        if let Some(head) = self.head.take() {
            head.send((self.status, self.headers.clone()))
                .map_err(|_| disconnected())?;
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), ResultError> {
        if self.head.is_none() {
            return Err(ResultError::AlreadyStarted);
        }
        Ok(())
    }
}

fn disconnected() -> ResultError {
    ResultError::Transport(io::Error::new(
        io::ErrorKind::BrokenPipe,
        "client disconnected",
    ))
}

#[async_trait]
impl ResponseSink for StreamingSink {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn has_started(&self) -> bool {
        self.head.is_none()
    }

    fn set_status(&mut self, status: StatusCode) -> Result<(), ResultError> {
        self.ensure_open()?;
        self.status = status;
        Ok(())
    }

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue) -> Result<(), ResultError> {
        self.ensure_open()?;
        self.headers.insert(name, value);
        Ok(())
    }

    async fn write(&mut self, chunk: Bytes) -> Result<(), ResultError> {
        self.start()?;
        self.body.send(Ok(chunk)).await.map_err(|_| disconnected())
    }

    async fn finish(&mut self) -> Result<(), ResultError> {
        self.start()
    }
}

impl PendingResponse {
    /// Wait for the head. `None` means the sink was dropped before the
    /// response started, i.e. the result failed early.
    pub async fn into_response(self) -> Option<Response> {
        let (status, headers) = self.head.await.ok()?;
        let mut response = Response::new(Body::from_stream(ReceiverStream::new(self.body)));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Some(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_head_delivered_on_first_write() {
        let (mut sink, pending) = StreamingSink::channel(4);
        sink.set_status(StatusCode::ACCEPTED).unwrap();
        sink.set_content_type("text/plain").unwrap();

        let writer = tokio::spawn(async move {
            sink.write(Bytes::from_static(b"one ")).await.unwrap();
            sink.write(Bytes::from_static(b"two")).await.unwrap();
            assert!(matches!(
                sink.set_status(StatusCode::OK),
                Err(ResultError::AlreadyStarted)
            ));
        });

        let response = pending.into_response().await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        writer.await.unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"one two");
    }

    #[tokio::test]
    async fn test_dropped_before_start_yields_no_response() {
        let (sink, pending) = StreamingSink::channel(1);
        drop(sink);
        assert!(pending.into_response().await.is_none());
    }

    #[tokio::test]
    async fn test_write_after_client_gone_is_transport_fault() {
        let (mut sink, pending) = StreamingSink::channel(1);
        drop(pending);
        let err = sink.write(Bytes::from_static(b"x")).await.unwrap_err();
        assert!(matches!(err, ResultError::Transport(_)));
    }

    #[tokio::test]
    async fn test_abort_fails_body_stream() {
        let (mut sink, pending) = StreamingSink::channel(4);
        sink.write(Bytes::from_static(b"partial")).await.unwrap();
        sink.abort(&ResultError::invalid("boom")).await;
        drop(sink);

        let response = pending.into_response().await.unwrap();
        let collected = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        assert!(collected.is_err());
    }
}
