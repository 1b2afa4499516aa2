// File: src/results/view.rs
// Purpose: Results that render Maud views, partial views and view components

use axum::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use maud::Markup;
use serde::Serialize;
use serde_json::Value;

use crate::context::ActionContext;
use crate::error::ResultError;
use crate::result::ActionResult;
use crate::sink::ResponseSink;
use crate::view::ViewContext;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

async fn write_html(
    sink: &mut dyn ResponseSink,
    status: Option<StatusCode>,
    markup: Markup,
) -> Result<(), ResultError> {
    sink.set_content_type(HTML_CONTENT_TYPE)?;
    if let Some(status) = status {
        sink.set_status(status)?;
    }
    sink.write(Bytes::from(markup.into_string())).await
}

/// Name, model and status shared by full and partial views.
#[derive(Debug, Clone, Default, PartialEq)]
struct ViewData {
    name: Option<String>,
    model: Option<Value>,
    status: Option<StatusCode>,
}

impl ViewData {
    fn render(&self, ctx: &ActionContext, with_layout: bool) -> Result<Markup, ResultError> {
        let name = self
            .name
            .as_deref()
            .or_else(|| ctx.action())
            .ok_or_else(|| ResultError::invalid("no view name given and no action is executing"))?;
        ctx.settings
            .views
            .render(name, ctx, self.model.as_ref(), with_layout)
    }
}

macro_rules! view_modifiers {
    ($ty:ty) => {
        impl $ty {
            /// View named after the executing action.
            pub fn new() -> Self {
                Self::default()
            }

            pub fn named(name: impl Into<String>) -> Self {
                Self::new().name(name)
            }

            pub fn name(mut self, name: impl Into<String>) -> Self {
                self.data.name = Some(name.into());
                self
            }

            pub fn model<T: Serialize>(mut self, model: T) -> Result<Self, ResultError> {
                self.data.model = Some(serde_json::to_value(model)?);
                Ok(self)
            }

            pub fn status(mut self, status: StatusCode) -> Self {
                self.data.status = Some(status);
                self
            }

            pub fn view_name(&self) -> Option<&str> {
                self.data.name.as_deref()
            }
        }
    };
}

// ============================================================================
// ViewResult
// ============================================================================

/// A view rendered inside the layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewResult {
    data: ViewData,
}

view_modifiers!(ViewResult);

#[async_trait]
impl ActionResult for ViewResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let markup = self.data.render(ctx, true)?;
        write_html(sink, self.data.status, markup).await
    }
}

// ============================================================================
// PartialViewResult
// ============================================================================

/// A view rendered on its own, for fragments swapped into a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialViewResult {
    data: ViewData,
}

view_modifiers!(PartialViewResult);

#[async_trait]
impl ActionResult for PartialViewResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let markup = self.data.render(ctx, false)?;
        write_html(sink, self.data.status, markup).await
    }
}

// ============================================================================
// ViewComponentResult
// ============================================================================

/// A registered view component rendered without the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewComponentResult {
    name: String,
    arguments: Option<Value>,
    status: Option<StatusCode>,
}

impl ViewComponentResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
            status: None,
        }
    }

    /// Passed to the component as its model.
    pub fn arguments<T: Serialize>(mut self, arguments: T) -> Result<Self, ResultError> {
        self.arguments = Some(serde_json::to_value(arguments)?);
        Ok(self)
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ActionResult for ViewComponentResult {
    async fn execute(
        self: Box<Self>,
        ctx: &ActionContext,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ResultError> {
        let engine = &ctx.settings.views;
        let view = ViewContext::new(ctx, self.arguments.as_ref(), engine);
        let markup = engine.invoke_component(&self.name, &view)?;
        write_html(sink, self.status, markup).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResultSettings;
    use crate::sink::BufferedSink;
    use crate::view::ViewEngine;
    use maud::html;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn ctx(action: &str) -> ActionContext {
        let views = ViewEngine::new()
            .view("Home/Index", |_| html! { h1 { "Anasayfa" } })
            .view("Home/AboutUs", |v| html! { p { (v.model_str("name").unwrap_or("")) } })
            .layout(|_, body| html! { body { (body) } })
            .component("ViewExample", |v: &ViewContext<'_>| {
                html! { span { (v.model_str("greeting").unwrap_or("ViewComponentExample")) } }
            });
        let settings = ResultSettings::default().with_views(views);
        ActionContext::new(Arc::new(settings)).with_action("Home", action)
    }

    async fn run<R: ActionResult + 'static>(result: R, ctx: &ActionContext) -> Result<BufferedSink, ResultError> {
        let mut sink = BufferedSink::new();
        Box::new(result).execute(ctx, &mut sink).await?;
        Ok(sink)
    }

    #[tokio::test]
    async fn test_view_defaults_to_action_name() {
        let sink = run(ViewResult::new(), &ctx("Index")).await.unwrap();
        assert_eq!(sink.content_type(), Some(HTML_CONTENT_TYPE));
        assert_eq!(sink.body_text(), "<body><h1>Anasayfa</h1></body>");
    }

    #[tokio::test]
    async fn test_named_view_with_model() {
        let result = ViewResult::named("AboutUs").model(json!({ "name": "Kemal" })).unwrap();
        let sink = run(result, &ctx("IndexWithName")).await.unwrap();
        assert_eq!(sink.body_text(), "<body><p>Kemal</p></body>");
    }

    #[tokio::test]
    async fn test_partial_view_skips_layout() {
        let result = PartialViewResult::named("Index").status(StatusCode::ACCEPTED);
        let sink = run(result, &ctx("PartialViewResult")).await.unwrap();
        assert_eq!(sink.status(), StatusCode::ACCEPTED);
        assert_eq!(sink.body_text(), "<h1>Anasayfa</h1>");
    }

    #[tokio::test]
    async fn test_missing_view_writes_nothing() {
        let err = run(ViewResult::new(), &ctx("Missing")).await.unwrap_err();
        assert!(matches!(err, ResultError::ViewNotFound { .. }));
    }

    #[tokio::test]
    async fn test_view_without_action_or_name() {
        let err = run(ViewResult::new(), &ActionContext::default()).await.unwrap_err();
        assert!(matches!(err, ResultError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_view_component() {
        let sink = run(ViewComponentResult::new("ViewExample"), &ctx("ViewComponentResult"))
            .await
            .unwrap();
        assert_eq!(sink.body_text(), "<span>ViewComponentExample</span>");

        let with_args = ViewComponentResult::new("ViewExample")
            .arguments(json!({ "greeting": "Merhaba" }))
            .unwrap();
        let sink = run(with_args, &ctx("ViewComponentResult")).await.unwrap();
        assert_eq!(sink.body_text(), "<span>Merhaba</span>");
    }

    #[tokio::test]
    async fn test_unknown_component() {
        let err = run(ViewComponentResult::new("Nope"), &ctx("Index")).await.unwrap_err();
        assert!(matches!(err, ResultError::ComponentNotFound(name) if name == "Nope"));
    }
}
