//! Field template rendering
//!
//! Expressions are handlebars templates rendered against a context holding
//! every attribute display value by name, the record being assigned as
//! `record` and the acting user as `user`. Building without the
//! `templating` feature keeps the crate usable but every render fails with
//! [`TemplateError::EngineUnavailable`].

use serde_json::{Map, Value};
use tracing::debug;

use crate::attributes::{FieldTarget, UserContext};
use crate::errors::{TemplateError, TemplateResult};

/// Whether this build can render field templates
pub const TEMPLATING_AVAILABLE: bool = cfg!(feature = "templating");

/// Variables visible to one expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    attributes: Map<String, Value>,
    record: Value,
    user: Value,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes<I, K>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<String>,
    {
        for (name, value) in values {
            self.attributes.insert(name.into(), Value::String(value));
        }
        self
    }

    /// Override or add a single attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: String) {
        self.attributes.insert(name.into(), Value::String(value));
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record = record;
        self
    }

    pub fn with_user(mut self, user: Option<&UserContext>) -> Self {
        self.user = match user {
            Some(user) => serde_json::to_value(user).unwrap_or(Value::Null),
            None => Value::Null,
        };
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// Attribute names shadow `record` and `user`
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert("record".to_string(), self.record.clone());
        root.insert("user".to_string(), self.user.clone());
        for (name, value) in &self.attributes {
            root.insert(name.clone(), value.clone());
        }
        Value::Object(root)
    }
}

pub struct ExpressionRenderer {
    #[cfg(feature = "templating")]
    engine: handlebars::Handlebars<'static>,
}

impl Default for ExpressionRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExpressionRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionRenderer")
            .field("available", &TEMPLATING_AVAILABLE)
            .finish()
    }
}

#[cfg(feature = "templating")]
impl ExpressionRenderer {
    pub fn new() -> Self {
        Self {
            engine: crate::common::get_handlebars(),
        }
    }

    pub fn is_available(&self) -> bool {
        true
    }

    /// Parse `expression` without rendering it
    pub fn check(&self, expression: &str) -> TemplateResult<()> {
        handlebars::Template::compile(expression)
            .map(|_| ())
            .map_err(|e| TemplateError::InvalidExpression(e.to_string()))
    }

    pub fn render(&self, target: FieldTarget, expression: &str, context: &RenderContext) -> TemplateResult<String> {
        self.check(expression)?;
        let rendered = self
            .engine
            .render_template(expression, &context.to_value())
            .map_err(|e| TemplateError::Render {
                target: target.as_str().to_string(),
                reason: e.to_string(),
            })?;
        debug!("Rendered {} as '{}'", target, rendered);
        Ok(rendered)
    }
}

#[cfg(not(feature = "templating"))]
impl ExpressionRenderer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn is_available(&self) -> bool {
        false
    }

    pub fn check(&self, _expression: &str) -> TemplateResult<()> {
        Err(TemplateError::EngineUnavailable)
    }

    pub fn render(&self, target: FieldTarget, _expression: &str, _context: &RenderContext) -> TemplateResult<String> {
        debug!("Refusing to render {} without a template engine", target);
        Err(TemplateError::EngineUnavailable)
    }
}
