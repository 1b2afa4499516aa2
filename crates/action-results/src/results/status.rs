// File: src/results/status.rs
// Purpose: Results that only set a status code

use axum::async_trait;
use axum::http::StatusCode;

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::result::ActionResult;
use crate::sink::ResponseSink;

/// Sets the status and sends an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodeResult {
    status: StatusCode,
}

impl StatusCodeResult {
    /// Any status in 100..=999; anything else is rejected here rather than
    /// when the response is written.
    pub fn new(code: u16) -> Result<Self, ResultError> {
        StatusCode::from_u16(code)
            .map(Self::from_status)
            .map_err(|_| ResultError::invalid(format!("{code} is not a valid HTTP status code")))
    }

    pub fn from_status(status: StatusCode) -> Self {
        Self { status }
    }

    /// 200
    pub fn ok() -> Self {
        Self::from_status(StatusCode::OK)
    }

    /// 204
    pub fn no_content() -> Self {
        Self::from_status(StatusCode::NO_CONTENT)
    }

    /// 400
    pub fn bad_request() -> Self {
        Self::from_status(StatusCode::BAD_REQUEST)
    }

    /// 401
    pub fn unauthorized() -> Self {
        Self::from_status(StatusCode::UNAUTHORIZED)
    }

    /// 404
    pub fn not_found() -> Self {
        Self::from_status(StatusCode::NOT_FOUND)
    }

    /// 415, e.g. an upload in a format the action does not take.
    pub fn unsupported_media_type() -> Self {
        Self::from_status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

#[async_trait]
impl ActionResult for StatusCodeResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        sink.set_status(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BufferedSink;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCodeResult::ok(), 200)]
    #[case(StatusCodeResult::no_content(), 204)]
    #[case(StatusCodeResult::bad_request(), 400)]
    #[case(StatusCodeResult::unauthorized(), 401)]
    #[case(StatusCodeResult::not_found(), 404)]
    #[case(StatusCodeResult::unsupported_media_type(), 415)]
    #[tokio::test]
    async fn test_named_results(#[case] result: StatusCodeResult, #[case] expected: u16) {
        let mut sink = BufferedSink::new();
        Box::new(result)
            .execute(&ActionContext::default(), &mut sink)
            .await
            .unwrap();
        assert_eq!(sink.status().as_u16(), expected);
        assert!(sink.body().is_empty());
    }

    #[rstest]
    #[case(418, true)]
    #[case(599, true)]
    #[case(99, false)]
    #[case(1000, false)]
    fn test_custom_codes(#[case] code: u16, #[case] valid: bool) {
        assert_eq!(StatusCodeResult::new(code).is_ok(), valid);
    }
}
