// File: src/results/object.rs
// Purpose: Negotiated object results (Ok, NotFound, Created, Accepted)

use axum::async_trait;
use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::negotiation::select_formatter_for;
use crate::result::ActionResult;
use crate::routes::RouteValues;
use crate::sink::ResponseSink;

// ============================================================================
// ModelState
// ============================================================================

/// Validation messages per field, serialized as `{"Field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelState {
    errors: BTreeMap<String, Vec<String>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_model_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(key.into()).or_default().push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self, key: &str) -> &[String] {
        self.errors.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

// ============================================================================
// Location
// ============================================================================

/// Where a created/accepted resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(String),
    Action {
        action: String,
        controller: Option<String>,
        values: RouteValues,
    },
    Route {
        name: String,
        values: RouteValues,
    },
}

impl Location {
    fn resolve(&self, ctx: &ActionContext) -> Result<String, ResultError> {
        let routes = &ctx.settings.routes;
        match self {
            Location::Url(url) => Ok(url.clone()),
            Location::Action {
                action,
                controller,
                values,
            } => routes.url_for_action(action, controller.as_deref(), values, &ctx.route_values),
            Location::Route { name, values } => routes.url_for_route(name, values, &ctx.route_values),
        }
    }
}

// ============================================================================
// ObjectResult
// ============================================================================

/// A value written in whatever format the client and the formatters agree on.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectResult {
    value: Value,
    status: Option<StatusCode>,
    location: Option<Location>,
    content_types: Vec<String>,
}

impl ObjectResult {
    /// Serialize `value` now so a bad payload fails in the handler.
    pub fn new<T: Serialize>(value: T) -> Result<Self, ResultError> {
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    pub fn from_value(value: Value) -> Self {
        Self {
            value,
            status: None,
            location: None,
            content_types: Vec::new(),
        }
    }

    pub fn with_status<T: Serialize>(status: StatusCode, value: T) -> Result<Self, ResultError> {
        Ok(Self::new(value)?.status(status))
    }

    /// 200 with a body.
    pub fn ok<T: Serialize>(value: T) -> Result<Self, ResultError> {
        Self::with_status(StatusCode::OK, value)
    }

    /// 404 with a body.
    pub fn not_found<T: Serialize>(value: T) -> Result<Self, ResultError> {
        Self::with_status(StatusCode::NOT_FOUND, value)
    }

    /// 400 with a body, typically a [`ModelState`].
    pub fn bad_request<T: Serialize>(value: T) -> Result<Self, ResultError> {
        Self::with_status(StatusCode::BAD_REQUEST, value)
    }

    /// 201 pointing at `url`.
    pub fn created<T: Serialize>(url: impl Into<String>, value: T) -> Result<Self, ResultError> {
        Ok(Self::with_status(StatusCode::CREATED, value)?.location(Location::Url(url.into())))
    }

    /// 201 pointing at an action's URL.
    pub fn created_at_action<T: Serialize>(
        action: impl Into<String>,
        controller: Option<&str>,
        values: RouteValues,
        value: T,
    ) -> Result<Self, ResultError> {
        Ok(Self::with_status(StatusCode::CREATED, value)?
            .location(action_location(action, controller, values)))
    }

    /// 201 pointing at a named route's URL.
    pub fn created_at_route<T: Serialize>(
        route: impl Into<String>,
        values: RouteValues,
        value: T,
    ) -> Result<Self, ResultError> {
        Ok(Self::with_status(StatusCode::CREATED, value)?.location(Location::Route {
            name: route.into(),
            values,
        }))
    }

    /// 202, optionally pointing at where progress can be checked.
    pub fn accepted<T: Serialize>(url: Option<&str>, value: T) -> Result<Self, ResultError> {
        let result = Self::with_status(StatusCode::ACCEPTED, value)?;
        Ok(match url {
            Some(url) => result.location(Location::Url(url.to_string())),
            None => result,
        })
    }

    pub fn accepted_at_action<T: Serialize>(
        action: impl Into<String>,
        controller: Option<&str>,
        values: RouteValues,
        value: T,
    ) -> Result<Self, ResultError> {
        Ok(Self::with_status(StatusCode::ACCEPTED, value)?
            .location(action_location(action, controller, values)))
    }

    pub fn accepted_at_route<T: Serialize>(
        route: impl Into<String>,
        values: RouteValues,
        value: T,
    ) -> Result<Self, ResultError> {
        Ok(Self::with_status(StatusCode::ACCEPTED, value)?.location(Location::Route {
            name: route.into(),
            values,
        }))
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Restrict negotiation to these media types.
    pub fn produces(mut self, content_type: impl Into<String>) -> Self {
        self.content_types.push(content_type.into());
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
    }
}

fn action_location(action: impl Into<String>, controller: Option<&str>, values: RouteValues) -> Location {
    Location::Action {
        action: action.into(),
        controller: controller.map(str::to_string),
        values,
    }
}

#[async_trait]
impl ActionResult for ObjectResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        // Resolve the location first: an unroutable location must not leave
        // a half-set head behind.
        let location = self
            .location
            .as_ref()
            .map(|l| l.resolve(ctx))
            .transpose()?;

        // A null value has no body. An unset or 200 status becomes 204.
        if self.value.is_null() {
            let status = match self.status {
                Some(status) if status != StatusCode::OK => status,
                _ => StatusCode::NO_CONTENT,
            };
            sink.set_status(status)?;
            return insert_location(sink, location);
        }

        let Some(selection) = select_formatter_for(
            ctx.accept(),
            &self.value,
            &ctx.settings.formatting,
            &self.content_types,
        ) else {
            sink.set_status(StatusCode::NOT_ACCEPTABLE)?;
            return Ok(());
        };

        let body = selection.formatter.render(&self.value)?;

        if let Some(status) = self.status {
            sink.set_status(status)?;
        }
        insert_location(sink, location)?;
        sink.set_content_type(&selection.content_type)?;
        sink.write(Bytes::from(body)).await
    }
}

fn insert_location(sink: &mut dyn ResponseSink, location: Option<String>) -> Result<(), ResultError> {
    let Some(location) = location else {
        return Ok(());
    };
    let value = HeaderValue::from_str(&location)
        .map_err(|_| ResultError::invalid(format!("invalid location '{location}'")))?;
    sink.insert_header(header::LOCATION, value)
}
