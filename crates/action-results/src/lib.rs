// action-results - self-executing HTTP action results for Axum
// Handlers return a value that knows how to write its own response

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod negotiation;
pub mod result;
pub mod results;
pub mod routes;
pub mod sink;
pub mod streaming;
pub mod view;

// Core capability and the seam to the host framework
pub use context::{ActionContext, ResultSettings};
pub use error::ResultError;
pub use executor::{action, error_response, streaming_action, HandlerFuture};
pub use result::{boxed, ActionResult, BoxedResult};
pub use sink::{BufferedSink, ResponseSink};
pub use streaming::{PendingResponse, StreamingSink};

// Framework types
pub use config::Config;
pub use negotiation::{FormatterOptions, OutputFormatter};
pub use routes::{RouteTable, RouteTemplate, RouteValues};
pub use view::{ViewComponent, ViewContext, ViewEngine};

// Every result variant
pub use results::{
    ContentResult, EmptyResult, FileContentResult, FileStreamResult, JavascriptResult, JsonResult,
    LocalRedirectResult, Location, ModelState, ObjectResult, PartialViewResult, PhysicalFileResult,
    RedirectResult, RedirectToActionResult, RedirectToRouteResult, StatusCodeResult,
    ViewComponentResult, ViewResult, VirtualFileResult,
};

// Re-export Maud for views
pub use maud::{html, Markup, PreEscaped, DOCTYPE};

// Re-export commonly used types from dependencies
pub use axum;
pub use axum::http::StatusCode;
