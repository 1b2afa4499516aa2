// File: src/view.rs
// Purpose: Registry of compiled Maud views, the layout and view components

use maud::Markup;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ActionContext;
use crate::error::ResultError;

/// A compiled view.
pub type ViewFn = Arc<dyn Fn(&ViewContext<'_>) -> Markup + Send + Sync>;

/// Wraps a rendered view in the site chrome.
pub type LayoutFn = Arc<dyn Fn(&ViewContext<'_>, Markup) -> Markup + Send + Sync>;

/// A reusable piece of UI rendered on its own or from inside a view.
pub trait ViewComponent: Send + Sync {
    fn invoke(&self, view: &ViewContext<'_>) -> Result<Markup, ResultError>;
}

impl<F> ViewComponent for F
where
    F: Fn(&ViewContext<'_>) -> Markup + Send + Sync,
{
    fn invoke(&self, view: &ViewContext<'_>) -> Result<Markup, ResultError> {
        Ok(self(view))
    }
}

/// What a view sees while rendering.
pub struct ViewContext<'a> {
    pub action: &'a ActionContext,
    pub model: Option<&'a Value>,
    engine: &'a ViewEngine,
}

impl<'a> ViewContext<'a> {
    pub fn new(action: &'a ActionContext, model: Option<&'a Value>, engine: &'a ViewEngine) -> Self {
        Self {
            action,
            model,
            engine,
        }
    }

    /// Render a view component in place.
    pub fn component(&self, name: &str) -> Result<Markup, ResultError> {
        self.engine.invoke_component(name, self)
    }

    /// A string field of the model, if any.
    pub fn model_str(&self, key: &str) -> Option<&str> {
        self.model?.get(key)?.as_str()
    }
}

/// Views keyed `Controller/Name` or `Shared/Name`.
#[derive(Clone, Default)]
pub struct ViewEngine {
    views: HashMap<String, ViewFn>,
    layout: Option<LayoutFn>,
    components: HashMap<String, Arc<dyn ViewComponent>>,
}

impl ViewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view<F>(mut self, key: impl Into<String>, view: F) -> Self
    where
        F: Fn(&ViewContext<'_>) -> Markup + Send + Sync + 'static,
    {
        self.views.insert(key.into(), Arc::new(view));
        self
    }

    pub fn layout<F>(mut self, layout: F) -> Self
    where
        F: Fn(&ViewContext<'_>, Markup) -> Markup + Send + Sync + 'static,
    {
        self.layout = Some(Arc::new(layout));
        self
    }

    pub fn component<C>(mut self, name: impl Into<String>, component: C) -> Self
    where
        C: ViewComponent + 'static,
    {
        self.components.insert(name.into(), Arc::new(component));
        self
    }

    /// Locations tried for `name` when rendering for `controller`.
    pub fn candidates(name: &str, controller: Option<&str>) -> Vec<String> {
        if let Some(explicit) = name.strip_prefix("~/").or_else(|| name.strip_prefix('/')) {
            return vec![explicit.to_string()];
        }
        let mut locations = Vec::new();
        if let Some(controller) = controller {
            locations.push(format!("{controller}/{name}"));
        }
        locations.push(format!("Shared/{name}"));
        locations
    }

    pub fn find(&self, name: &str, controller: Option<&str>) -> Result<&ViewFn, ResultError> {
        let searched = Self::candidates(name, controller);
        searched
            .iter()
            .find_map(|key| self.views.get(key))
            .ok_or_else(|| ResultError::ViewNotFound {
                name: name.to_string(),
                searched: searched.clone(),
            })
    }

    /// Render a view, through the layout when `with_layout` is set.
    pub fn render(
        &self,
        name: &str,
        ctx: &ActionContext,
        model: Option<&Value>,
        with_layout: bool,
    ) -> Result<Markup, ResultError> {
        let view = self.find(name, ctx.controller())?;
        let view_ctx = ViewContext::new(ctx, model, self);
        let body = view(&view_ctx);
        match (&self.layout, with_layout) {
            (Some(layout), true) => Ok(layout(&view_ctx, body)),
            _ => Ok(body),
        }
    }

    pub fn invoke_component(&self, name: &str, view: &ViewContext<'_>) -> Result<Markup, ResultError> {
        self.components
            .get(name)
            .ok_or_else(|| ResultError::ComponentNotFound(name.to_string()))?
            .invoke(view)
    }
}
