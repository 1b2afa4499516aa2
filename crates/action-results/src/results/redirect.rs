// File: src/results/redirect.rs
// Purpose: Redirect results to a URL, a local URL, an action or a named route

use axum::async_trait;
use axum::http::{header, HeaderValue, StatusCode};

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::result::ActionResult;
use crate::routes::RouteValues;
use crate::sink::ResponseSink;

/// Permanence and method preservation shared by every redirect.
///
/// | permanent | preserve method | status |
/// |-----------|-----------------|--------|
/// | no        | no              | 302    |
/// | yes       | no              | 301    |
/// | no        | yes             | 307    |
/// | yes       | yes             | 308    |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectKind {
    pub permanent: bool,
    pub preserve_method: bool,
}

impl RedirectKind {
    pub fn status_code(self) -> StatusCode {
        match (self.permanent, self.preserve_method) {
            (false, false) => StatusCode::FOUND,
            (true, false) => StatusCode::MOVED_PERMANENTLY,
            (false, true) => StatusCode::TEMPORARY_REDIRECT,
            (true, true) => StatusCode::PERMANENT_REDIRECT,
        }
    }
}

fn redirect_to(
    sink: &mut dyn ResponseSink,
    kind: RedirectKind,
    url: &str,
) -> Result<(), ResultError> {
    let location = HeaderValue::from_str(url)
        .map_err(|_| ResultError::invalid(format!("invalid redirect url '{url}'")))?;
    sink.set_status(kind.status_code())?;
    sink.insert_header(header::LOCATION, location)?;
    Ok(())
}

macro_rules! redirect_modifiers {
    ($ty:ty) => {
        impl $ty {
            /// Use 301/308 instead of 302/307.
            pub fn permanent(mut self) -> Self {
                self.kind.permanent = true;
                self
            }

            /// Use 307/308 so the client repeats the original method.
            pub fn preserve_method(mut self) -> Self {
                self.kind.preserve_method = true;
                self
            }

            pub fn status_code(&self) -> StatusCode {
                self.kind.status_code()
            }
        }
    };
}

// ============================================================================
// RedirectResult
// ============================================================================

/// Redirect to any URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectResult {
    url: String,
    kind: RedirectKind,
}

impl RedirectResult {
    pub fn new(url: impl Into<String>) -> Result<Self, ResultError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ResultError::invalid("redirect url must not be empty"));
        }
        Ok(Self {
            url,
            kind: RedirectKind::default(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

redirect_modifiers!(RedirectResult);

#[async_trait]
impl ActionResult for RedirectResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        redirect_to(sink, self.kind, &self.url)
    }
}

// ============================================================================
// LocalRedirectResult
// ============================================================================

/// Redirect that refuses to leave the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRedirectResult {
    url: String,
    kind: RedirectKind,
}

impl LocalRedirectResult {
    /// `url` must be app-relative (`/path` or `~/path`). Protocol-relative
    /// (`//host`) and backslash tricks (`/\host`) are rejected.
    pub fn new(url: impl Into<String>) -> Result<Self, ResultError> {
        let url = url.into();
        if !is_local_url(&url) {
            return Err(ResultError::invalid(format!(
                "the supplied url '{url}' is not local"
            )));
        }
        let url = match url.strip_prefix('~') {
            Some(rest) => rest.to_string(),
            None => url,
        };
        Ok(Self {
            url,
            kind: RedirectKind::default(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

redirect_modifiers!(LocalRedirectResult);

/// `/`, `/path` and `~/path` are local; `//x`, `/\x`, `~//x`, `~/\x` and
/// absolute URLs are not.
pub fn is_local_url(url: &str) -> bool {
    let path = match url.strip_prefix('~') {
        Some(rest) => rest,
        None => url,
    };
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some('/'), None) => true,
        (Some('/'), Some(second)) => second != '/' && second != '\\',
        _ => false,
    }
}

#[async_trait]
impl ActionResult for LocalRedirectResult {
    async fn execute(
        self: Box<Self>,
        _ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        redirect_to(sink, self.kind, &self.url)
    }
}

// ============================================================================
// RedirectToActionResult
// ============================================================================

/// Redirect to the URL of an action, generated when executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectToActionResult {
    action: String,
    controller: Option<String>,
    values: RouteValues,
    kind: RedirectKind,
}

impl RedirectToActionResult {
    /// Action in the current controller.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            controller: None,
            values: RouteValues::new(),
            kind: RedirectKind::default(),
        }
    }

    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn values(mut self, values: RouteValues) -> Self {
        self.values = values;
        self
    }
}

redirect_modifiers!(RedirectToActionResult);

#[async_trait]
impl ActionResult for RedirectToActionResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let url = ctx.settings.routes.url_for_action(
            &self.action,
            self.controller.as_deref(),
            &self.values,
            &ctx.route_values,
        )?;
        redirect_to(sink, self.kind, &url)
    }
}

// ============================================================================
// RedirectToRouteResult
// ============================================================================

/// Redirect through a named route, generated when executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectToRouteResult {
    route: String,
    values: RouteValues,
    kind: RedirectKind,
}

impl RedirectToRouteResult {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            values: RouteValues::new(),
            kind: RedirectKind::default(),
        }
    }

    pub fn values(mut self, values: RouteValues) -> Self {
        self.values = values;
        self
    }
}

redirect_modifiers!(RedirectToRouteResult);

#[async_trait]
impl ActionResult for RedirectToRouteResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let url = ctx
            .settings
            .routes
            .url_for_route(&self.route, &self.values, &ctx.route_values)?;
        redirect_to(sink, self.kind, &url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResultSettings;
    use crate::routes::RouteTable;
    use crate::sink::BufferedSink;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn ctx() -> ActionContext {
        let routes = RouteTable::conventional()
            .with_route_defaults(
                "BlogListRoute",
                "blog",
                RouteValues::new().with("controller", "Blog").with("action", "List"),
            )
            .unwrap();
        let settings = ResultSettings {
            routes,
            ..ResultSettings::default()
        };
        ActionContext::new(Arc::new(settings)).with_action("Home", "RedirectActionResult")
    }

    async fn location_of<R: ActionResult + 'static>(result: R) -> (StatusCode, String) {
        let mut sink = BufferedSink::new();
        Box::new(result).execute(&ctx(), &mut sink).await.unwrap();
        let location = sink.headers()[header::LOCATION].to_str().unwrap().to_string();
        (sink.status(), location)
    }

    #[rstest]
    #[case(false, false, 302)]
    #[case(true, false, 301)]
    #[case(false, true, 307)]
    #[case(true, true, 308)]
    fn test_redirect_kind(#[case] permanent: bool, #[case] preserve_method: bool, #[case] expected: u16) {
        let kind = RedirectKind { permanent, preserve_method };
        assert_eq!(kind.status_code().as_u16(), expected);
    }

    #[tokio::test]
    async fn test_redirect() {
        let (status, location) = location_of(RedirectResult::new("https://www.domain.net").unwrap()).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://www.domain.net");
    }

    #[tokio::test]
    async fn test_permanent_redirect() {
        let result = RedirectResult::new("/").unwrap().permanent();
        let (status, _) = location_of(result).await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    }

    #[test]
    fn test_empty_redirect_rejected() {
        assert!(matches!(RedirectResult::new("  "), Err(ResultError::InvalidArgument(_))));
    }

    #[rstest]
    #[case("/", true)]
    #[case("/aboutus", true)]
    #[case("~/aboutus", true)]
    #[case("//evil.example", false)]
    #[case("/\\evil.example", false)]
    #[case("~//evil.example", false)]
    #[case("https://evil.example", false)]
    #[case("aboutus", false)]
    #[case("", false)]
    fn test_is_local_url(#[case] url: &str, #[case] local: bool) {
        assert_eq!(is_local_url(url), local);
    }

    #[tokio::test]
    async fn test_local_redirect_strips_tilde() {
        let (status, location) = location_of(LocalRedirectResult::new("~/aboutus").unwrap()).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "/aboutus");
    }

    #[test]
    fn test_local_redirect_rejects_external() {
        assert!(LocalRedirectResult::new("https://www.domain.net").is_err());
    }

    #[tokio::test]
    async fn test_redirect_to_action_uses_ambient_controller() {
        let (_, location) = location_of(RedirectToActionResult::new("Index")).await;
        assert_eq!(location, "/");

        let (status, location) = location_of(
            RedirectToActionResult::new("Details")
                .controller("Blog")
                .values(RouteValues::new().with("id", 5))
                .permanent(),
        )
        .await;
        assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location, "/Blog/Details/5");
    }

    #[tokio::test]
    async fn test_redirect_to_route() {
        let (status, location) = location_of(RedirectToRouteResult::new("BlogListRoute")).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "/blog");
    }

    #[tokio::test]
    async fn test_redirect_to_unknown_route_fails() {
        let mut sink = BufferedSink::new();
        let err = Box::new(RedirectToRouteResult::new("Nope"))
            .execute(&ctx(), &mut sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ResultError::NoRouteMatch(_)));
        assert!(sink.headers().get(header::LOCATION).is_none());
    }
}
