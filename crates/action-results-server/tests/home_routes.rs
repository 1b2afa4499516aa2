//! HTTP tests for the Home controller.
//!
//! The app is built from `action-results.toml` in the crate root, so the
//! `BlogListRoute` and the `wwwroot/` stylesheet are the real ones.

use action_results::Config;
use action_results_server::{app, settings};
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;

fn server() -> TestServer {
    let config = Config::load_default().unwrap();
    TestServer::new(app(Arc::new(settings(&config).unwrap()))).unwrap()
}

fn site_css() -> String {
    std::fs::read_to_string("wwwroot/css/site.css").unwrap()
}

// ============================================================================
// View results
// ============================================================================

#[tokio::test]
async fn test_index_renders_inside_layout() {
    let response = server().get("/").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "text/html; charset=utf-8"
    );
    let body = response.text();
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("<h1>Action Results</h1>"));
}

#[tokio::test]
async fn test_index_with_name_renders_about_us() {
    let body = server().get("/Home/IndexWithName").await.text();
    assert!(body.contains("<h2>Hakkımızda</h2>"));
    assert!(body.contains("IndexWithName"));
}

#[tokio::test]
async fn test_partial_view_has_no_layout() {
    let body = server().get("/Home/PartialViewResult").await.text();
    assert!(body.starts_with(r#"<div class="partial">"#));
    assert!(!body.contains("<html"));
}

#[tokio::test]
async fn test_view_component() {
    let response = server().get("/Home/ViewComponentResult").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.text(),
        r#"<div class="view-component">ViewComponentExample</div>"#
    );
}

#[tokio::test]
async fn test_json_result() {
    let response = server().get("/Home/JsonResult").await;
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "application/json; charset=utf-8"
    );
    let body: Value = response.json();
    assert_eq!(body["message"], "Json içeriği.");
    assert!(body["date"].is_string());
}

#[tokio::test]
async fn test_content_result() {
    let response = server().get("/Home/ContentResult").await;
    assert_eq!(response.header(header::CONTENT_TYPE), "text/plain");
    assert_eq!(response.text(), "ContentResult içeriği.");
}

#[tokio::test]
async fn test_empty_result() {
    let response = server().get("/Home/EmptyResult").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "");
}

// ============================================================================
// Status code results
// ============================================================================

#[rstest]
#[case("/Home/BadRequestResult", StatusCode::BAD_REQUEST)]
#[case("/Home/NotFoundActionResult", StatusCode::NOT_FOUND)]
#[case("/Home/SuccessResult", StatusCode::OK)]
#[case("/Home/NoContentResult", StatusCode::NO_CONTENT)]
#[case("/Home/UnsupportedMediaTypeResult", StatusCode::UNSUPPORTED_MEDIA_TYPE)]
#[case("/Home/UnauthorizedResult", StatusCode::UNAUTHORIZED)]
#[tokio::test]
async fn test_status_only_results(#[case] path: &str, #[case] expected: StatusCode) {
    let response = server().get(path).await;
    response.assert_status(expected);
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn test_bad_request_object_carries_model_state() {
    let response = server().get("/Home/BadRequestObjectActionResult").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "Name": ["Name is required."] }));
}

#[tokio::test]
async fn test_not_found_object() {
    let response = server().get("/Home/NotFoundObjectActionResult").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "404 Not Found");
}

#[tokio::test]
async fn test_object_results_default_to_ok() {
    let server = server();
    server.get("/Home/ObjectResult").await.assert_status(StatusCode::OK);

    let response = server.get("/Home/OkObjectResult").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "200 OK");
}

#[rstest]
#[case("durumKodu", "418", StatusCode::IM_A_TEAPOT)]
#[case("code", "202", StatusCode::ACCEPTED)]
#[case("durumKodu", "abc", StatusCode::BAD_REQUEST)]
#[case("durumKodu", "1200", StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_status_code_from_query(#[case] key: &str, #[case] value: &str, #[case] expected: StatusCode) {
    server()
        .get("/Home/StatusCodeResult")
        .add_query_param(key, value)
        .await
        .assert_status(expected);
}

#[tokio::test]
async fn test_status_code_with_object() {
    let response = server().get("/Home/StatusCodeWithObject").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "Message": "404 Not found!..." }));
}

#[rstest]
#[case("/Home/CreatedActionResult", StatusCode::CREATED, "/Home/Index")]
#[case("/Home/CreatedAtActionActionResult", StatusCode::CREATED, "/Home/IndexWithId/2")]
#[case("/Home/CreatedAtRouteActionResult", StatusCode::CREATED, "/Home/IndexWithId/2")]
#[case("/Home/AcceptedActionResult", StatusCode::ACCEPTED, "/Home/Index")]
#[case("/Home/AcceptedAtActionActionResult", StatusCode::ACCEPTED, "/Home/IndexWithId/2")]
#[case("/Home/AcceptedAtRouteActionResult", StatusCode::ACCEPTED, "/Home/IndexWithId/2")]
#[tokio::test]
async fn test_created_and_accepted_locations(
    #[case] path: &str,
    #[case] expected: StatusCode,
    #[case] location: &str,
) {
    let response = server().get(path).await;
    response.assert_status(expected);
    assert_eq!(response.header(header::LOCATION), location);
}

#[tokio::test]
async fn test_generated_location_is_served() {
    let response = server().get("/Home/IndexWithId/2").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "IndexWithId: 2");
}

#[tokio::test]
async fn test_object_result_honours_accept() {
    let response = server()
        .get("/Home/OkObjectResult")
        .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
        .await;
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "application/json; charset=utf-8"
    );
}

// ============================================================================
// Redirect results
// ============================================================================

#[rstest]
#[case("/Home/RedirectResult", "https://www.domain.net")]
#[case("/Home/RedirectActionResult", "/")]
#[case("/Home/RedirectToRouteResult", "/blog")]
#[case("/Home/LocalRedirectResult", "/aboutus")]
#[tokio::test]
async fn test_redirects(#[case] path: &str, #[case] location: &str) {
    let response = server().get(path).await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header(header::LOCATION), location);
}

// ============================================================================
// File results
// ============================================================================

#[tokio::test]
async fn test_file_result_downloads_under_new_name() {
    let response = server().get("/Home/FileResult").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "text/plain");
    assert!(response
        .header(header::CONTENT_DISPOSITION)
        .to_str()
        .unwrap()
        .contains("filename=\"rename.css\""));
    assert_eq!(response.text(), site_css());
}

#[rstest]
#[case("/Home/FileStreamActionResult")]
#[case("/Home/FileContentResult")]
#[case("/Home/VirtualFileResult")]
#[case("/Home/PhysicalFileResult")]
#[tokio::test]
async fn test_file_results_send_stylesheet(#[case] path: &str) {
    let response = server().get(path).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.header(header::ACCEPT_RANGES), "bytes");
    assert_eq!(response.text(), site_css());
}

#[tokio::test]
async fn test_stylesheet_route() {
    let response = server().get("/css/site.css").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "text/css");

    server()
        .get("/css/missing.css")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Custom result
// ============================================================================

#[tokio::test]
async fn test_javascript_result() {
    let response = server().get("/Home/JavascriptResult").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "text/html");
    assert_eq!(
        response.text(),
        "<script>alert('Custom Action Result')</script>"
    );
}
