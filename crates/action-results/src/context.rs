// File: src/context.rs
// Purpose: Per-request context handed to results, and the settings shared by all requests

use axum::async_trait;
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ResultError;
use crate::negotiation::FormatterOptions;
use crate::routes::{RouteTable, RouteValues};
use crate::view::ViewEngine;

/// Everything results need from the application, built once at startup.
#[derive(Clone)]
pub struct ResultSettings {
    pub routes: RouteTable,
    pub views: ViewEngine,
    pub formatting: FormatterOptions,
    /// Root for virtual paths (`~/css/site.css`).
    pub web_root: PathBuf,
    /// Chunks in flight for streamed responses.
    pub stream_buffer: usize,
}

impl ResultSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            routes: config.route_table()?,
            views: ViewEngine::new(),
            formatting: config.formatting.clone(),
            web_root: config.content.web_root_path(),
            stream_buffer: config.server.stream_buffer,
        })
    }

    pub fn with_views(mut self, views: ViewEngine) -> Self {
        self.views = views;
        self
    }
}

impl Default for ResultSettings {
    fn default() -> Self {
        Self {
            routes: RouteTable::conventional(),
            views: ViewEngine::new(),
            formatting: FormatterOptions::default(),
            web_root: PathBuf::from("wwwroot"),
            stream_buffer: 16,
        }
    }
}

static DEFAULT_SETTINGS: Lazy<Arc<ResultSettings>> = Lazy::new(|| Arc::new(ResultSettings::default()));

/// The request a result is finishing, as seen by results.
#[derive(Clone)]
pub struct ActionContext {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    /// `controller`, `action` and any captured path parameters.
    pub route_values: RouteValues,
    pub settings: Arc<ResultSettings>,
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("route_values", &self.route_values)
            .finish()
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS.clone())
    }
}

impl ActionContext {
    pub fn new(settings: Arc<ResultSettings>) -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: HashMap::new(),
            headers: HeaderMap::new(),
            route_values: RouteValues::new(),
            settings,
        }
    }

    pub fn with_action(mut self, controller: &str, action: &str) -> Self {
        self.route_values.insert("controller", controller);
        self.route_values.insert("action", action);
        self
    }

    /// Fails on a value that is not a legal header value.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Result<Self, ResultError> {
        let value = HeaderValue::from_str(value)
            .map_err(|_| ResultError::invalid(format!("invalid value for header '{name}'")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_route_value(mut self, key: &str, value: impl ToString) -> Self {
        self.route_values.insert(key, value);
        self
    }

    pub fn controller(&self) -> Option<&str> {
        self.route_values.get("controller")
    }

    pub fn action(&self) -> Option<&str> {
        self.route_values.get("action")
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn accept(&self) -> Option<&str> {
        self.get_header("accept")
    }

    /// Query parameter parsed into `T`.
    pub fn query_as<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.query.get(key)?.parse().ok()
    }
}

/// Built from the request head. Settings come from an
/// `Extension<Arc<ResultSettings>>` layer, falling back to defaults.
#[async_trait]
impl<S> FromRequestParts<S> for ActionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = parts
            .extensions
            .get::<Arc<ResultSettings>>()
            .cloned()
            .unwrap_or_else(|| DEFAULT_SETTINGS.clone());

        let query = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Query(q)| q)
            .unwrap_or_default();

        let path_params = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Path(p)| p)
            .unwrap_or_default();

        let mut ctx = ActionContext::new(settings);
        ctx.method = parts.method.clone();
        ctx.path = parts.uri.path().to_string();
        ctx.query = query;
        ctx.headers = parts.headers.clone();
        for (key, value) in path_params {
            ctx.route_values.insert(key, value);
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    #[tokio::test]
    async fn test_extracts_request_head() {
        let settings = Arc::new(ResultSettings {
            web_root: PathBuf::from("public"),
            ..ResultSettings::default()
        });
        let request = Request::builder()
            .method(Method::POST)
            .uri("/Home/StatusCodeResult?code=418")
            .header(header::ACCEPT, "application/json")
            .extension(settings)
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let ctx = ActionContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.method, Method::POST);
        assert_eq!(ctx.path, "/Home/StatusCodeResult");
        assert_eq!(ctx.query_as::<u16>("code"), Some(418));
        assert_eq!(ctx.accept(), Some("application/json"));
        assert_eq!(ctx.settings.web_root, PathBuf::from("public"));
    }

    #[tokio::test]
    async fn test_missing_extension_uses_defaults() {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let ctx = ActionContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.settings.web_root, PathBuf::from("wwwroot"));
        assert!(ctx.query.is_empty());
    }

    #[test]
    fn test_with_header() {
        let ctx = ActionContext::default()
            .with_header(header::ACCEPT, "text/plain")
            .unwrap();
        assert_eq!(ctx.accept(), Some("text/plain"));

        let result = ActionContext::default().with_header(header::ACCEPT, "text/plain\r\nX-Injected: 1");
        assert!(matches!(result, Err(ResultError::InvalidArgument(_))));
    }

    #[test]
    fn test_with_action_sets_route_values() {
        let ctx = ActionContext::default().with_action("Home", "Index");
        assert_eq!(ctx.controller(), Some("Home"));
        assert_eq!(ctx.action(), Some("Index"));
    }
}
