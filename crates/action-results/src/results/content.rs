// File: src/results/content.rs
// Purpose: JSON, raw content and empty results

use axum::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::result::ActionResult;
use crate::sink::ResponseSink;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

// ============================================================================
// JsonResult
// ============================================================================

/// Always JSON, whatever the client asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResult {
    value: Value,
    status: Option<StatusCode>,
}

impl JsonResult {
    pub fn new<T: Serialize>(value: T) -> Result<Self, ResultError> {
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    pub fn from_value(value: Value) -> Self {
        Self {
            value,
            status: None,
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[async_trait]
impl ActionResult for JsonResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let body = serde_json::to_vec(&self.value)?;
        sink.set_content_type(JSON_CONTENT_TYPE)?;
        if let Some(status) = self.status {
            sink.set_status(status)?;
        }
        sink.write(Bytes::from(body)).await
    }
}

// ============================================================================
// ContentResult
// ============================================================================

/// Text written as-is with the given content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentResult {
    content: String,
    content_type: Option<String>,
    status: Option<StatusCode>,
}

impl ContentResult {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: None,
            status: None,
        }
    }

    pub fn with_content_type(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::new(content).content_type(content_type)
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }
}

#[async_trait]
impl ActionResult for ContentResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        sink.set_content_type(self.content_type.as_deref().unwrap_or(TEXT_CONTENT_TYPE))?;
        if let Some(status) = self.status {
            sink.set_status(status)?;
        }
        sink.write(Bytes::from(self.content)).await
    }
}

// ============================================================================
// EmptyResult
// ============================================================================

/// Leaves the response exactly as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyResult;

#[async_trait]
impl ActionResult for EmptyResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        _sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        Ok(())
    }
}
