// File: src/home.rs
// Purpose: The Home controller, one action per kind of result

use action_results::results::{self, FileStreamResult, ModelState, ObjectResult};
use action_results::{
    boxed, ActionContext, BoxedResult, ContentResult, EmptyResult, FileContentResult,
    JavascriptResult, JsonResult, LocalRedirectResult, PartialViewResult, PhysicalFileResult,
    RedirectResult, RedirectToActionResult, RedirectToRouteResult, ResultError, RouteValues,
    StatusCodeResult, ViewComponentResult, ViewResult, VirtualFileResult,
};
use chrono::Local;
use serde_json::json;
use std::path::PathBuf;

const SITE_CSS: &str = "css/site.css";

// ============================================================================
// View results
// ============================================================================

pub fn index(_ctx: &ActionContext) -> ViewResult {
    results::view()
}

pub fn index_with_name(_ctx: &ActionContext) -> ViewResult {
    ViewResult::named("AboutUs")
}

/// Target of the created/accepted-at-action samples.
pub fn index_with_id(ctx: &ActionContext) -> ContentResult {
    let id = ctx.route_values.get("id").unwrap_or("");
    results::content(format!("IndexWithId: {id}"))
}

pub fn partial_view_result(_ctx: &ActionContext) -> PartialViewResult {
    PartialViewResult::new()
}

pub fn view_component_result(_ctx: &ActionContext) -> ViewComponentResult {
    results::view_component("ViewComponentExample")
}

pub fn json_result(_ctx: &ActionContext) -> Result<JsonResult, ResultError> {
    results::json(json!({ "message": "Json içeriği.", "date": Local::now() }))
}

pub fn content_result(_ctx: &ActionContext) -> ContentResult {
    ContentResult::with_content_type("ContentResult içeriği.", "text/plain")
}

pub fn empty_result(_ctx: &ActionContext) -> EmptyResult {
    EmptyResult
}

// ============================================================================
// Status code results
// ============================================================================

pub fn bad_request_result(_ctx: &ActionContext) -> StatusCodeResult {
    results::bad_request()
}

pub fn bad_request_object_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    let mut model_state = ModelState::new();
    model_state.add_model_error("Name", "Name is required.");
    ObjectResult::bad_request(model_state)
}

pub fn not_found_result(_ctx: &ActionContext) -> StatusCodeResult {
    results::not_found()
}

pub fn not_found_object_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::not_found(json!({ "message": "404 Not Found", "currentDate": Local::now() }))
}

pub fn object_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::new(json!({ "currentDate": Local::now() }))
}

pub fn success_result(_ctx: &ActionContext) -> StatusCodeResult {
    results::ok()
}

pub fn ok_object_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    results::ok_object(json!({ "message": "200 OK", "currentDate": Local::now() }))
}

pub fn no_content_result(_ctx: &ActionContext) -> StatusCodeResult {
    results::no_content()
}

/// Status from `?durumKodu=` (or `?code=`); 400 when neither is a number.
pub fn status_code_result(ctx: &ActionContext) -> BoxedResult {
    let code = ctx
        .query_as::<u16>("durumKodu")
        .or_else(|| ctx.query_as::<u16>("code"));
    match code {
        Some(code) => boxed(results::status_code(code)),
        None => boxed(results::bad_request()),
    }
}

pub fn status_code_with_object(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::with_status(
        action_results::StatusCode::NOT_FOUND,
        json!({ "Message": "404 Not found!..." }),
    )
}

pub fn created_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::created("/Home/Index", json!({ "Name": "Created Action Result" }))
}

pub fn created_at_action_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::created_at_action(
        "IndexWithId",
        Some("Home"),
        RouteValues::new().with("id", 2),
        json!({ "Name": "201 Created Object!.." }),
    )
}

pub fn created_at_route_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::created_at_route(
        "default",
        RouteValues::new().with("action", "IndexWithId").with("id", 2),
        json!({ "Name": "201 Created Object!.." }),
    )
}

pub fn accepted_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::accepted(Some("/Home/Index"), json!({ "Name": "Accepted Result" }))
}

pub fn accepted_at_action_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::accepted_at_action(
        "IndexWithId",
        Some("Home"),
        RouteValues::new().with("id", 2),
        json!({ "Name": "Hamid" }),
    )
}

pub fn accepted_at_route_result(_ctx: &ActionContext) -> Result<ObjectResult, ResultError> {
    ObjectResult::accepted_at_route(
        "default",
        RouteValues::new().with("action", "IndexWithId").with("id", 2),
        json!({ "Name": "Hamid" }),
    )
}

pub fn unsupported_media_type_result(_ctx: &ActionContext) -> StatusCodeResult {
    StatusCodeResult::unsupported_media_type()
}

pub fn unauthorized_result(_ctx: &ActionContext) -> StatusCodeResult {
    StatusCodeResult::unauthorized()
}

// ============================================================================
// Redirect results
// ============================================================================

pub fn redirect_result(_ctx: &ActionContext) -> Result<RedirectResult, ResultError> {
    results::redirect("https://www.domain.net")
}

pub fn redirect_action_result(_ctx: &ActionContext) -> RedirectToActionResult {
    results::redirect_to_action("Index")
}

pub fn redirect_to_route_result(_ctx: &ActionContext) -> RedirectToRouteResult {
    results::redirect_to_route("BlogListRoute")
}

pub fn local_redirect_result(_ctx: &ActionContext) -> Result<LocalRedirectResult, ResultError> {
    results::local_redirect("/aboutus")
}

// ============================================================================
// File results
// ============================================================================

pub fn file_result(_ctx: &ActionContext) -> VirtualFileResult {
    VirtualFileResult::new(format!("~/{SITE_CSS}"), "text/plain").download_name("rename.css")
}

pub fn file_stream_result(ctx: &ActionContext) -> Result<FileStreamResult, ResultError> {
    Ok(FileStreamResult::open(site_css(ctx)?, "text/plain").download_name("site.css"))
}

pub fn file_content_result(ctx: &ActionContext) -> Result<FileContentResult, ResultError> {
    Ok(FileContentResult::read(site_css(ctx)?, "text/plain"))
}

/// Serves the stylesheets the layout links to.
pub fn stylesheet(ctx: &ActionContext) -> VirtualFileResult {
    let file = ctx.route_values.get("file").unwrap_or_default();
    VirtualFileResult::new(format!("/css/{file}"), "text/css")
}

pub fn virtual_file_result(_ctx: &ActionContext) -> VirtualFileResult {
    VirtualFileResult::new(format!("/{SITE_CSS}"), "text/plain")
}

pub fn physical_file_result(ctx: &ActionContext) -> Result<PhysicalFileResult, ResultError> {
    PhysicalFileResult::new(site_css(ctx)?, "text/plain")
}

/// Absolute path of the demo stylesheet under the web root.
fn site_css(ctx: &ActionContext) -> Result<PathBuf, ResultError> {
    let web_root = &ctx.settings.web_root;
    let web_root = if web_root.is_absolute() {
        web_root.clone()
    } else {
        std::env::current_dir()?.join(web_root)
    };
    Ok(web_root.join(SITE_CSS))
}

// ============================================================================
// Custom result
// ============================================================================

pub fn javascript_result(_ctx: &ActionContext) -> JavascriptResult {
    results::javascript("alert('Custom Action Result')")
}
