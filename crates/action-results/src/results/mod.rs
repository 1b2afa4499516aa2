// File: src/results/mod.rs
// Purpose: The concrete result variants and shorthand constructors for handlers

pub mod content;
pub mod file;
pub mod javascript;
pub mod object;
pub mod redirect;
pub mod status;
pub mod view;

pub use content::{ContentResult, EmptyResult, JsonResult};
pub use file::{FileContentResult, FileOptions, FileStreamResult, PhysicalFileResult, VirtualFileResult};
pub use javascript::{JavascriptResult, JAVASCRIPT_RESULT_CONTENT_TYPE};
pub use object::{Location, ModelState, ObjectResult};
pub use redirect::{
    is_local_url, LocalRedirectResult, RedirectKind, RedirectResult, RedirectToActionResult,
    RedirectToRouteResult,
};
pub use status::StatusCodeResult;
pub use view::{PartialViewResult, ViewComponentResult, ViewResult};

use serde::Serialize;

use crate::error::ResultError;

// ============================================================================
// Shorthands
// ============================================================================

/// View named after the executing action.
pub fn view() -> ViewResult {
    ViewResult::new()
}

pub fn partial_view(name: impl Into<String>) -> PartialViewResult {
    PartialViewResult::named(name)
}

pub fn view_component(name: impl Into<String>) -> ViewComponentResult {
    ViewComponentResult::new(name)
}

pub fn json<T: Serialize>(value: T) -> Result<JsonResult, ResultError> {
    JsonResult::new(value)
}

pub fn content(text: impl Into<String>) -> ContentResult {
    ContentResult::new(text)
}

pub fn ok() -> StatusCodeResult {
    StatusCodeResult::ok()
}

pub fn ok_object<T: Serialize>(value: T) -> Result<ObjectResult, ResultError> {
    ObjectResult::ok(value)
}

pub fn not_found() -> StatusCodeResult {
    StatusCodeResult::not_found()
}

pub fn bad_request() -> StatusCodeResult {
    StatusCodeResult::bad_request()
}

pub fn no_content() -> StatusCodeResult {
    StatusCodeResult::no_content()
}

pub fn status_code(code: u16) -> Result<StatusCodeResult, ResultError> {
    StatusCodeResult::new(code)
}

pub fn redirect(url: impl Into<String>) -> Result<RedirectResult, ResultError> {
    RedirectResult::new(url)
}

pub fn local_redirect(url: impl Into<String>) -> Result<LocalRedirectResult, ResultError> {
    LocalRedirectResult::new(url)
}

pub fn redirect_to_action(action: impl Into<String>) -> RedirectToActionResult {
    RedirectToActionResult::new(action)
}

pub fn redirect_to_route(route: impl Into<String>) -> RedirectToRouteResult {
    RedirectToRouteResult::new(route)
}

pub fn javascript(script: impl std::fmt::Display) -> JavascriptResult {
    JavascriptResult::new(script)
}
