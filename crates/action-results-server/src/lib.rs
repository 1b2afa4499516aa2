// action-results-server - demo application
// Every kind of action result behind a /Home/<Action> route

pub mod home;
pub mod views;

use action_results::{action, streaming_action, Config, ResultSettings};
use axum::{routing::get, Extension, Router};
use std::sync::Arc;

/// Settings for the demo: routes from the config, views from [`views::engine`].
pub fn settings(config: &Config) -> anyhow::Result<ResultSettings> {
    Ok(ResultSettings::from_config(config)?.with_views(views::engine()))
}

/// Register the Home controller.
pub fn app(settings: Arc<ResultSettings>) -> Router {
    Router::new()
        .route("/", get(action("Home", "Index", home::index)))
        .route("/css/*file", get(streaming_action("Static", "Stylesheet", home::stylesheet)))
        // View results
        .route("/Home/Index", get(action("Home", "Index", home::index)))
        .route("/Home/IndexWithName", get(action("Home", "IndexWithName", home::index_with_name)))
        .route("/Home/IndexWithId/:id", get(action("Home", "IndexWithId", home::index_with_id)))
        .route("/Home/PartialViewResult", get(action("Home", "PartialViewResult", home::partial_view_result)))
        .route("/Home/ViewComponentResult", get(action("Home", "ViewComponentResult", home::view_component_result)))
        .route("/Home/JsonResult", get(action("Home", "JsonResult", home::json_result)))
        .route("/Home/ContentResult", get(action("Home", "ContentResult", home::content_result)))
        .route("/Home/EmptyResult", get(action("Home", "EmptyResult", home::empty_result)))
        // Status code results
        .route("/Home/BadRequestResult", get(action("Home", "BadRequestResult", home::bad_request_result)))
        .route(
            "/Home/BadRequestObjectActionResult",
            get(action("Home", "BadRequestObjectActionResult", home::bad_request_object_result)),
        )
        .route("/Home/NotFoundActionResult", get(action("Home", "NotFoundActionResult", home::not_found_result)))
        .route(
            "/Home/NotFoundObjectActionResult",
            get(action("Home", "NotFoundObjectActionResult", home::not_found_object_result)),
        )
        .route("/Home/ObjectResult", get(action("Home", "ObjectResult", home::object_result)))
        .route("/Home/SuccessResult", get(action("Home", "SuccessResult", home::success_result)))
        .route("/Home/OkObjectResult", get(action("Home", "OkObjectResult", home::ok_object_result)))
        .route("/Home/NoContentResult", get(action("Home", "NoContentResult", home::no_content_result)))
        .route("/Home/StatusCodeResult", get(action("Home", "StatusCodeResult", home::status_code_result)))
        .route("/Home/StatusCodeWithObject", get(action("Home", "StatusCodeWithObject", home::status_code_with_object)))
        .route("/Home/CreatedActionResult", get(action("Home", "CreatedActionResult", home::created_result)))
        .route(
            "/Home/CreatedAtActionActionResult",
            get(action("Home", "CreatedAtActionActionResult", home::created_at_action_result)),
        )
        .route(
            "/Home/CreatedAtRouteActionResult",
            get(action("Home", "CreatedAtRouteActionResult", home::created_at_route_result)),
        )
        .route("/Home/AcceptedActionResult", get(action("Home", "AcceptedActionResult", home::accepted_result)))
        .route(
            "/Home/AcceptedAtActionActionResult",
            get(action("Home", "AcceptedAtActionActionResult", home::accepted_at_action_result)),
        )
        .route(
            "/Home/AcceptedAtRouteActionResult",
            get(action("Home", "AcceptedAtRouteActionResult", home::accepted_at_route_result)),
        )
        .route(
            "/Home/UnsupportedMediaTypeResult",
            get(action("Home", "UnsupportedMediaTypeResult", home::unsupported_media_type_result)),
        )
        .route("/Home/UnauthorizedResult", get(action("Home", "UnauthorizedResult", home::unauthorized_result)))
        // Redirect results
        .route("/Home/RedirectResult", get(action("Home", "RedirectResult", home::redirect_result)))
        .route("/Home/RedirectActionResult", get(action("Home", "RedirectActionResult", home::redirect_action_result)))
        .route("/Home/RedirectToRouteResult", get(action("Home", "RedirectToRouteResult", home::redirect_to_route_result)))
        .route("/Home/LocalRedirectResult", get(action("Home", "LocalRedirectResult", home::local_redirect_result)))
        // File results are streamed
        .route("/Home/FileResult", get(streaming_action("Home", "FileResult", home::file_result)))
        .route(
            "/Home/FileStreamActionResult",
            get(streaming_action("Home", "FileStreamActionResult", home::file_stream_result)),
        )
        .route("/Home/FileContentResult", get(action("Home", "FileContentResult", home::file_content_result)))
        .route("/Home/VirtualFileResult", get(streaming_action("Home", "VirtualFileResult", home::virtual_file_result)))
        .route(
            "/Home/PhysicalFileResult",
            get(streaming_action("Home", "PhysicalFileResult", home::physical_file_result)),
        )
        // Custom result
        .route("/Home/JavascriptResult", get(action("Home", "JavascriptResult", home::javascript_result)))
        .layer(Extension(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = Config::default();
        app(Arc::new(settings(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_javascript_route() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/Home/JavascriptResult")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_app()
            .oneshot(Request::builder().uri("/Home/Nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
