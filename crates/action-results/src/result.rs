// File: src/result.rs
// Purpose: The capability every handler return value implements

use axum::async_trait;

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::sink::ResponseSink;

/// A value that knows how to finish an HTTP request.
///
/// Handlers build one per request; the executor calls [`execute`] exactly
/// once with the live sink and then finalizes the response. Side effects are
/// limited to that sink.
///
/// [`execute`]: ActionResult::execute
#[async_trait]
pub trait ActionResult: Send {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError>;
}

/// A result whose concrete type is decided at runtime, for handlers with
/// more than one outcome.
pub type BoxedResult = Box<dyn ActionResult>;

/// Erase the concrete result type.
pub fn boxed<R: ActionResult + 'static>(result: R) -> BoxedResult {
    Box::new(result)
}

#[async_trait]
impl ActionResult for BoxedResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        <dyn ActionResult as ActionResult>::execute(*self, ctx, sink).await
    }
}

/// A construction fault reaches the executor without anything being written.
#[async_trait]
impl<R: ActionResult> ActionResult for Result<R, ResultError> {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        match *self {
            Ok(result) => Box::new(result).execute(ctx, sink).await,
            Err(err) => Err(err),
        }
    }
}
