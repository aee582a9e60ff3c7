//! Field template errors
//!
//! Raised while parsing a field template's target reference or while
//! rendering its expression against the attribute values of a record.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    /// The crate was built without the `templating` feature
    #[error("Template engine is not available; rebuild with the `templating` feature")]
    EngineUnavailable,

    /// Target reference is not one of the known `object,field` pairs
    #[error("Invalid field template target: '{0}'")]
    InvalidTarget(String),

    /// Expression does not parse
    #[error("Invalid template expression: {0}")]
    InvalidExpression(String),

    /// Expression parsed but failed to render
    #[error("Failed to render template for {target}: {reason}")]
    Render {
        /// Target reference being rendered
        target: String,
        /// Engine error message
        reason: String,
    },
}

impl TemplateError {
    /// Configuration errors are surfaced to the administrator, engine absence is not theirs to fix
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TemplateError::InvalidTarget(_)
                | TemplateError::InvalidExpression(_)
                | TemplateError::Render { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TemplateError::EngineUnavailable => "TEMPLATE_ENGINE_UNAVAILABLE",
            TemplateError::InvalidTarget(_) => "TEMPLATE_INVALID_TARGET",
            TemplateError::InvalidExpression(_) => "TEMPLATE_INVALID_EXPRESSION",
            TemplateError::Render { .. } => "TEMPLATE_RENDER_FAILED",
        }
    }
}
