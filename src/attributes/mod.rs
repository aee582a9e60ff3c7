//! Attribute domain model
//!
//! Pure types and rules shared by the services: the attribute type tag,
//! the tagged attribute value and its eight-column storage form, value
//! formatting, field template targets, form view state, the
//! fill-on-selection recomputation and duplication rebinding.

pub mod access;
pub mod duplication;
pub mod field_target;
pub mod fill;
pub mod format;
pub mod types;
pub mod value;
pub mod view_state;

pub use access::{AccessContext, ElevatedRead, UserContext};
pub use field_target::{FieldTarget, TargetObject};
pub use fill::{AttributeSetSnapshot, FillOutcome};
pub use format::FormatPolicy;
pub use types::AttributeType;
pub use value::{AttributeRef, AttributeValue, SelectionChoice, TypedValue, ValueColumns};
pub use view_state::FieldState;
