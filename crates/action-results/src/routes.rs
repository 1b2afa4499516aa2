// File: src/routes.rs
// Purpose: Named route templates and URL generation for redirect and created-at results

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ResultError;

// ============================================================================
// RouteValues
// ============================================================================

/// Route values keyed case-insensitively (keys are stored lowercase).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValues(BTreeMap<String, String>);

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl AsRef<str>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl ToString) {
        self.0.insert(key.as_ref().to_lowercase(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty value for `key`; empty strings count as absent.
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

impl<K: AsRef<str>, V: ToString> FromIterator<(K, V)> for RouteValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = RouteValues::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

impl fmt::Display for RouteValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

// ============================================================================
// RouteTemplate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param {
        name: String,
        default: Option<String>,
        optional: bool,
    },
}

/// A parsed template such as `{controller=Home}/{action=Index}/{id?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    pub fn parse(template: &str) -> Result<Self, ResultError> {
        let trimmed = template.trim().trim_matches('/');
        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let segments = parts
            .iter()
            .map(|part| parse_segment(template, part))
            .collect::<Result<Vec<_>, _>>()?;

        // Optional parameters must come last.
        let optional_before_end = segments
            .iter()
            .rev()
            .skip(1)
            .any(|s| matches!(s, Segment::Param { optional: true, .. }));
        if optional_before_end {
            return Err(ResultError::invalid(format!(
                "route template '{template}': an optional parameter must be the last segment"
            )));
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn has_param(&self, key: &str) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Param { name, .. } if name.eq_ignore_ascii_case(key)))
    }

    fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

fn parse_segment(template: &str, part: &str) -> Result<Segment, ResultError> {
    let invalid = |why: &str| ResultError::invalid(format!("route template '{template}': {why}"));

    let Some(inner) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) else {
        if part.is_empty() || part.contains(['{', '}']) {
            return Err(invalid(&format!("malformed segment '{part}'")));
        }
        return Ok(Segment::Literal(part.to_string()));
    };

    let (name, default, optional) = match inner.split_once('=') {
        Some((name, default)) => (name, Some(default.to_string()), false),
        None => match inner.strip_suffix('?') {
            Some(name) => (name, None, true),
            None => (inner, None, false),
        },
    };

    let valid_name = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_name {
        return Err(invalid(&format!("invalid parameter name '{name}'")));
    }

    Ok(Segment::Param {
        name: name.to_lowercase(),
        default,
        optional,
    })
}

// ============================================================================
// RouteTable
// ============================================================================

#[derive(Debug, Clone)]
struct RouteEntry {
    name: String,
    template: RouteTemplate,
    /// Values the route implies without capturing them, e.g. `controller=Blog`.
    required: RouteValues,
}

impl RouteEntry {
    /// Build a URL from `values`, or `None` if the route cannot express them.
    fn generate(&self, values: &RouteValues) -> Option<String> {
        let conflicts = self.required.iter().any(|(key, expected)| {
            values
                .value(key)
                .is_some_and(|given| !given.eq_ignore_ascii_case(expected))
        });
        if conflicts {
            return None;
        }

        // (text, droppable) per segment; droppable segments may vanish from the tail.
        let segments: Option<Vec<(String, bool)>> = self
            .template
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Some((text.clone(), false)),
                Segment::Param { name, default, optional } => match values.value(name) {
                    Some(given) => {
                        let is_default = default
                            .as_deref()
                            .is_some_and(|d| d.eq_ignore_ascii_case(given));
                        Some((urlencoding::encode(given).into_owned(), is_default))
                    }
                    None => match default {
                        Some(d) => Some((d.clone(), true)),
                        None if *optional => Some((String::new(), true)),
                        None => None,
                    },
                },
            })
            .collect();

        let mut segments = segments?;
        while segments.last().is_some_and(|(_, droppable)| *droppable) {
            segments.pop();
        }

        let path = format!(
            "/{}",
            segments
                .into_iter()
                .map(|(text, _)| text)
                .collect::<Vec<_>>()
                .join("/")
        );

        let query: Vec<String> = values
            .iter()
            .filter(|(key, value)| {
                !value.is_empty() && !self.template.has_param(key) && !self.required.contains(key)
            })
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();

        if query.is_empty() {
            Some(path)
        } else {
            Some(format!("{}?{}", path, query.join("&")))
        }
    }
}

/// Ordered set of named routes used to turn route values back into URLs.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional `{controller=Home}/{action=Index}/{id?}` route named `default`.
    pub fn conventional() -> Self {
        let mut table = Self::new();
        table
            .add("default", "{controller=Home}/{action=Index}/{id?}", RouteValues::new())
            .expect("conventional template is valid");
        table
    }

    pub fn with_route(mut self, name: impl Into<String>, template: &str) -> Result<Self, ResultError> {
        self.add(name, template, RouteValues::new())?;
        Ok(self)
    }

    pub fn with_route_defaults(
        mut self,
        name: impl Into<String>,
        template: &str,
        defaults: RouteValues,
    ) -> Result<Self, ResultError> {
        self.add(name, template, defaults)?;
        Ok(self)
    }

    /// Register a route. Defaults naming a template parameter become that
    /// parameter's default; the rest are values the route implies.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        template: &str,
        defaults: RouteValues,
    ) -> Result<(), ResultError> {
        let mut template = RouteTemplate::parse(template)?;
        let mut required = RouteValues::new();

        for (key, value) in defaults.iter() {
            let param = template.segments.iter_mut().find_map(|s| match s {
                Segment::Param { name, default, optional } if name == key => Some((default, optional)),
                _ => None,
            });
            match param {
                Some((default, optional)) => {
                    *default = Some(value.to_string());
                    *optional = false;
                }
                None => required.insert(key, value),
            }
        }

        self.routes.push(RouteEntry {
            name: name.into(),
            template,
            required,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.name.as_str())
    }

    /// URL for an action. `controller` falls back to the supplied values,
    /// then to the ambient controller; the first route able to express the
    /// values wins.
    pub fn url_for_action(
        &self,
        action: &str,
        controller: Option<&str>,
        values: &RouteValues,
        ambient: &RouteValues,
    ) -> Result<String, ResultError> {
        let mut merged = values.clone();
        merged.insert("action", action);
        if let Some(controller) = controller {
            merged.insert("controller", controller);
        } else if merged.value("controller").is_none() {
            if let Some(current) = ambient.value("controller") {
                merged.insert("controller", current);
            }
        }

        self.routes
            .iter()
            .find_map(|route| route.generate(&merged))
            .ok_or_else(|| ResultError::NoRouteMatch(merged.to_string()))
    }

    /// URL through one named route. Ambient controller/action fill the
    /// template's parameters when not supplied.
    pub fn url_for_route(
        &self,
        name: &str,
        values: &RouteValues,
        ambient: &RouteValues,
    ) -> Result<String, ResultError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ResultError::NoRouteMatch(format!("no route named '{name}'")))?;

        let mut merged = values.clone();
        let ambient_keys: Vec<&str> = route
            .template
            .param_names()
            .filter(|key| matches!(*key, "controller" | "action"))
            .collect();
        for key in ambient_keys {
            if merged.value(key).is_none() {
                if let Some(current) = ambient.value(key) {
                    merged.insert(key, current);
                }
            }
        }

        route
            .generate(&merged)
            .ok_or_else(|| ResultError::NoRouteMatch(format!("route '{name}' with {merged}")))
    }
}
