// File: src/executor.rs
// Purpose: Runs a result against a sink and turns the outcome into an axum response

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use maud::{html, DOCTYPE};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, error, warn};

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::result::ActionResult;
use crate::sink::{BufferedSink, ResponseSink};
use crate::streaming::StreamingSink;

/// Future returned by the handlers built with [`action`] and [`streaming_action`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

impl ActionContext {
    /// Execute `result` into a buffered response.
    ///
    /// Faults are logged and answered with an error page carrying
    /// [`ResultError::status_code`]; whatever the result wrote is discarded.
    pub async fn run<R: ActionResult + 'static>(&self, result: R) -> Response {
        let mut sink = BufferedSink::new();
        let outcome = match Box::new(result).execute(self, &mut sink).await {
            Ok(()) => sink.finish().await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => {
                debug!(path = %self.path, status = %sink.status(), "action result executed");
                sink.into_response()
            }
            Err(err) => {
                error!(path = %self.path, error = %err, "action result failed");
                error_response(&err)
            }
        }
    }

    /// Execute `result` on its own task, answering as soon as the head is
    /// ready and streaming the body after it.
    ///
    /// A fault before the head goes out becomes an error page. A fault after
    /// it terminates the body stream, so the client sees a broken transfer
    /// rather than a short body.
    pub async fn run_streaming<R: ActionResult + 'static>(&self, result: R) -> Response {
        let (mut sink, pending) = StreamingSink::channel(self.settings.stream_buffer);
        let ctx = self.clone();

        let task = tokio::spawn(async move {
            let outcome = match Box::new(result).execute(&ctx, &mut sink).await {
                Ok(()) => sink.finish().await,
                Err(err) => Err(err),
            };
            if let Err(err) = &outcome {
                if sink.has_started() {
                    warn!(path = %ctx.path, error = %err, "aborting streamed response");
                    sink.abort(err).await;
                }
            }
            outcome
        });

        if let Some(response) = pending.into_response().await {
            return response;
        }

        let err = match task.await {
            Ok(Err(err)) => err,
            Ok(Ok(())) => ResultError::invalid("result finished without starting the response"),
            Err(join) => ResultError::Transport(std::io::Error::new(std::io::ErrorKind::Other, join)),
        };
        error!(path = %self.path, error = %err, "action result failed");
        error_response(&err)
    }
}

/// Adapt `handler` into an axum handler that records `controller` and
/// `action` as route values and executes whatever it returns.
///
/// ```ignore
/// Router::new().route("/Home/Index", get(action("Home", "Index", |_| view())))
/// ```
pub fn action<F, R>(
    controller: &'static str,
    action: &'static str,
    handler: F,
) -> impl Fn(ActionContext) -> HandlerFuture + Clone + Send + Sync + 'static
where
    F: Fn(&ActionContext) -> R + Clone + Send + Sync + 'static,
    R: ActionResult + 'static,
{
    move |ctx: ActionContext| {
        let handler = handler.clone();
        Box::pin(async move {
            let ctx = ctx.with_action(controller, action);
            let result = handler(&ctx);
            ctx.run(result).await
        })
    }
}

/// Like [`action`], with the body streamed through [`ActionContext::run_streaming`].
pub fn streaming_action<F, R>(
    controller: &'static str,
    action: &'static str,
    handler: F,
) -> impl Fn(ActionContext) -> HandlerFuture + Clone + Send + Sync + 'static
where
    F: Fn(&ActionContext) -> R + Clone + Send + Sync + 'static,
    R: ActionResult + 'static,
{
    move |ctx: ActionContext| {
        let handler = handler.clone();
        Box::pin(async move {
            let ctx = ctx.with_action(controller, action);
            let result = handler(&ctx);
            ctx.run_streaming(result).await
        })
    }
}

/// Small HTML page describing a fault.
pub fn error_response(err: &ResultError) -> Response {
    let status = err.status_code();
    let title = status.canonical_reason().unwrap_or("Error");
    let page = html! {
        (DOCTYPE)
        html {
            head { title { (title) } }
            body {
                h1 { (status.as_u16()) " " (title) }
                p { (err) }
                a href="/" { "Go Home" }
            }
        }
    };
    (status, Html(page.into_string())).into_response()
}

impl IntoResponse for ResultError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}
