pub mod attribute_service;
pub mod attribute_set_service;
pub mod attribute_value_service;
pub mod catalog_service;
pub mod duplication_service;
pub mod template_derivation_service;
pub mod validation;

pub use attribute_service::*;
pub use attribute_set_service::*;
pub use attribute_value_service::*;
pub use catalog_service::*;
pub use duplication_service::*;
pub use template_derivation_service::*;
