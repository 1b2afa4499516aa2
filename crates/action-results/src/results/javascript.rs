// File: src/results/javascript.rs
// Purpose: Custom result that answers with an inline script

use axum::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde::Serialize;
use std::fmt;

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::result::ActionResult;
use crate::sink::ResponseSink;

/// Content type announced for every script response.
pub const JAVASCRIPT_RESULT_CONTENT_TYPE: &str = "text/html";

/// Answers with `<script>{value}</script>`.
///
/// The payload is embedded verbatim: nothing is escaped, so a value
/// containing `</script>` ends the tag early. Callers own what they embed.
///
/// ```ignore
/// JavascriptResult::new("alert('Custom Action Result')")
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavascriptResult {
    value: String,
    status: Option<StatusCode>,
}

impl JavascriptResult {
    /// Render `value` to text now; execution only copies it out.
    pub fn new(value: impl fmt::Display) -> Self {
        Self {
            value: value.to_string(),
            status: None,
        }
    }

    pub fn with_status(value: impl fmt::Display, status: StatusCode) -> Self {
        Self::new(value).status(status)
    }

    /// Embed a structured payload as a JSON literal, e.g. for
    /// `window.__DATA__ = ...` style bootstrapping.
    pub fn from_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ResultError> {
        Ok(Self::new(serde_json::to_string(value)?))
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
    }

    fn body(&self) -> String {
        format!("<script>{}</script>", self.value)
    }
}

#[async_trait]
impl ActionResult for JavascriptResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        sink.set_content_type(JAVASCRIPT_RESULT_CONTENT_TYPE)?;
        sink.set_status(self.status.unwrap_or(StatusCode::OK))?;
        sink.write(Bytes::from(self.body())).await
    }
}
