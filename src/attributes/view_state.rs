//! Per-record form state: which fields are required, hidden or read-only.
//! Recomputed for each record, never stored.

use std::collections::BTreeMap;

use serde::Serialize;

use super::types::AttributeType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub required: bool,
    pub invisible: bool,
    pub readonly: bool,
}

impl FieldState {
    pub fn visible() -> Self {
        Self::default()
    }

    pub fn hidden() -> Self {
        Self {
            invisible: true,
            ..Self::default()
        }
    }
}

/// Only the column matching the attribute type is shown, and it is required
pub fn value_column_states(attribute_type: Option<AttributeType>) -> BTreeMap<&'static str, FieldState> {
    AttributeType::ALL
        .iter()
        .map(|ty| {
            let live = attribute_type == Some(*ty);
            let state = FieldState {
                required: live,
                invisible: !live,
                readonly: false,
            };
            (ty.value_column(), state)
        })
        .collect()
}

/// Selection options of an attribute definition
pub fn selection_options_state(attribute_type: AttributeType) -> FieldState {
    if attribute_type == AttributeType::Selection {
        FieldState::visible()
    } else {
        FieldState::hidden()
    }
}

/// Field templates of an attribute set
pub fn field_templates_state(use_templates: bool) -> FieldState {
    if use_templates {
        FieldState::visible()
    } else {
        FieldState::hidden()
    }
}

/// Attribute value collection of a template or product
pub fn attribute_values_state(attribute_set_id: Option<i32>) -> FieldState {
    FieldState {
        readonly: attribute_set_id.is_none(),
        ..FieldState::default()
    }
}

/// The "update attributes values" action
pub fn update_action_state(use_templates: bool) -> FieldState {
    field_templates_state(use_templates)
}
