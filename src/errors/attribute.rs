//! Attribute and catalog error types
//!
//! Covers attribute definitions, attribute sets, selection options, the
//! typed values attached to templates and products, and the host catalog
//! records themselves.
//!
//! # Examples
//!
//! ```rust
//! use product_attributes::errors::AttributeError;
//!
//! let err = AttributeError::NotInAttributeSet {
//!     attribute: "Color".to_string(),
//!     attribute_set: Some("Apparel".to_string()),
//! };
//! assert_eq!(err.error_code(), "ATTRIBUTE_NOT_IN_SET");
//! ```

use thiserror::Error;

use crate::attributes::AttributeType;
use crate::errors::TemplateError;

#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("Attribute {0} not found")]
    AttributeNotFound(i32),

    #[error("Attribute set {0} not found")]
    AttributeSetNotFound(i32),

    #[error("Selection option {0} not found")]
    SelectionOptionNotFound(i32),

    #[error("Field template {0} not found")]
    FieldTemplateNotFound(i32),

    #[error("Template {0} not found")]
    TemplateNotFound(i32),

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Attribute value {0} not found")]
    ValueNotFound(i32),

    /// Attribute does not belong to the effective attribute set of the owning template
    #[error("Attribute '{attribute}' is not part of attribute set {}", .attribute_set.as_deref().unwrap_or("(none)"))]
    NotInAttributeSet {
        attribute: String,
        attribute_set: Option<String>,
    },

    #[error("Attribute '{attribute}' expects a {expected} value, got {found}")]
    TypeMismatch {
        attribute: String,
        expected: AttributeType,
        found: AttributeType,
    },

    /// Selection options only exist on selection attributes
    #[error("Attribute '{0}' is not a selection attribute")]
    SelectionNotAllowed(String),

    #[error("Selection option {option} does not belong to attribute '{attribute}'")]
    ForeignOption { option: i32, attribute: String },

    #[error("Attribute '{attribute}' is already attached to this record")]
    AlreadyAttached { attribute: String },

    /// Refused because other records still reference the target
    #[error("{0} is still in use")]
    InUse(String),

    #[error("Product {product} does not belong to template {template}")]
    ProductTemplateMismatch { product: i32, template: i32 },

    #[error("Unknown attribute type '{0}'")]
    UnknownType(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AttributeError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        match self {
            AttributeError::Database(_) => false,
            AttributeError::Template(err) => err.is_client_error(),
            _ => true,
        }
    }

    /// Check if this reports a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AttributeError::AttributeNotFound(_)
                | AttributeError::AttributeSetNotFound(_)
                | AttributeError::SelectionOptionNotFound(_)
                | AttributeError::FieldTemplateNotFound(_)
                | AttributeError::TemplateNotFound(_)
                | AttributeError::ProductNotFound(_)
                | AttributeError::ValueNotFound(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AttributeError::AttributeNotFound(_) => "ATTRIBUTE_NOT_FOUND",
            AttributeError::AttributeSetNotFound(_) => "ATTRIBUTE_SET_NOT_FOUND",
            AttributeError::SelectionOptionNotFound(_) => "SELECTION_OPTION_NOT_FOUND",
            AttributeError::FieldTemplateNotFound(_) => "FIELD_TEMPLATE_NOT_FOUND",
            AttributeError::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            AttributeError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            AttributeError::ValueNotFound(_) => "ATTRIBUTE_VALUE_NOT_FOUND",
            AttributeError::NotInAttributeSet { .. } => "ATTRIBUTE_NOT_IN_SET",
            AttributeError::TypeMismatch { .. } => "ATTRIBUTE_TYPE_MISMATCH",
            AttributeError::SelectionNotAllowed(_) => "SELECTION_NOT_ALLOWED",
            AttributeError::ForeignOption { .. } => "SELECTION_OPTION_FOREIGN",
            AttributeError::AlreadyAttached { .. } => "ATTRIBUTE_ALREADY_ATTACHED",
            AttributeError::InUse(_) => "RECORD_IN_USE",
            AttributeError::ProductTemplateMismatch { .. } => "PRODUCT_TEMPLATE_MISMATCH",
            AttributeError::UnknownType(_) => "ATTRIBUTE_TYPE_UNKNOWN",
            AttributeError::Validation(_) => "VALIDATION_FAILED",
            AttributeError::Template(err) => err.error_code(),
            AttributeError::Database(_) => "DATABASE_ERROR",
        }
    }
}
