//! Domain-specific error types for product attributes
//!
//! # Error Categories
//!
//! - **AttributeError**: attributes, attribute sets, typed values and the catalog records they hang off
//! - **TemplateError**: field template targets and expression rendering
//! - **ConfigError**: loading and validating the YAML configuration
//!
//! # Examples
//!
//! ```rust
//! use product_attributes::errors::{AttributeError, TemplateError};
//!
//! let err = AttributeError::AttributeNotFound(42);
//! assert!(err.is_client_error());
//!
//! let err = TemplateError::InvalidTarget("product".to_string());
//! assert_eq!(err.error_code(), "TEMPLATE_INVALID_TARGET");
//! ```

pub mod attribute;
pub mod config;
pub mod template;

pub use attribute::AttributeError;
pub use config::ConfigError;
pub use template::TemplateError;

/// Result type alias for attribute and catalog operations
pub type AttributeResult<T> = Result<T, AttributeError>;

/// Result type alias for rendering operations
pub type TemplateResult<T> = Result<T, TemplateError>;
