// File: src/sink.rs
// Purpose: The mutable response a result writes itself into

use axum::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

use crate::error::ResultError;

/// The in-flight HTTP response for a single request.
///
/// Status and headers can change until the response starts, which happens on
/// the first body write or on [`ResponseSink::finish`]. After that every
/// mutation fails with [`ResultError::AlreadyStarted`].
#[async_trait]
pub trait ResponseSink: Send {
    fn status(&self) -> StatusCode;

    fn headers(&self) -> &HeaderMap;

    fn has_started(&self) -> bool;

    fn set_status(&mut self, status: StatusCode) -> Result<(), ResultError>;

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue) -> Result<(), ResultError>;

    /// Append bytes to the body, starting the response if needed.
    async fn write(&mut self, chunk: Bytes) -> Result<(), ResultError>;

    /// Start the response if the body stayed empty. Calling it twice is harmless.
    async fn finish(&mut self) -> Result<(), ResultError>;

    fn set_content_type(&mut self, content_type: &str) -> Result<(), ResultError> {
        let value = HeaderValue::from_str(content_type)
            .map_err(|_| ResultError::invalid(format!("invalid content type '{content_type}'")))?;
        self.insert_header(header::CONTENT_TYPE, value)
    }

    fn content_type(&self) -> Option<&str> {
        self.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

// ============================================================================
// BufferedSink
// ============================================================================

/// Collects the whole body in memory and hands it to axum once the result
/// is done. Writes never fail.
#[derive(Debug)]
pub struct BufferedSink {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    started: bool,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            started: false,
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    fn ensure_open(&self) -> Result<(), ResultError> {
        if self.started {
            return Err(ResultError::AlreadyStarted);
        }
        Ok(())
    }
}

impl Default for BufferedSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseSink for BufferedSink {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn has_started(&self) -> bool {
        self.started
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
        self.started = true;
        self.body.extend_from_slice(&chunk);
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), ResultError> {
        self.started = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_headers_locked_after_first_write() {
        let mut sink = BufferedSink::new();
        sink.set_status(StatusCode::ACCEPTED).unwrap();
        sink.set_content_type("text/plain").unwrap();
        sink.write(Bytes::from_static(b"hello")).await.unwrap();

        assert!(sink.has_started());
        assert!(matches!(
            sink.set_status(StatusCode::OK),
            Err(ResultError::AlreadyStarted)
        ));
        assert!(matches!(
            sink.set_content_type("text/html"),
            Err(ResultError::AlreadyStarted)
        ));
        assert_eq!(sink.status(), StatusCode::ACCEPTED);
        assert_eq!(sink.content_type(), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_writes_append() {
        let mut sink = BufferedSink::new();
        sink.write(Bytes::from_static(b"<script>")).await.unwrap();
        sink.write(Bytes::from_static(b"</script>")).await.unwrap();
        assert_eq!(sink.body_text(), "<script></script>");
    }

    #[tokio::test]
    async fn test_finish_starts_empty_response() {
        let mut sink = BufferedSink::new();
        sink.set_status(StatusCode::NO_CONTENT).unwrap();
        sink.finish().await.unwrap();
        sink.finish().await.unwrap();
        assert!(sink.has_started());

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_invalid_content_type_rejected() {
        let mut sink = BufferedSink::new();
        let err = sink.set_content_type("text/html\n").unwrap_err();
        assert!(matches!(err, ResultError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_into_response_carries_everything() {
        let mut sink = BufferedSink::new();
        sink.set_status(StatusCode::CREATED).unwrap();
        sink.set_content_type("application/json").unwrap();
        sink.write(Bytes::from_static(b"{}")).await.unwrap();

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{}");
    }
}
