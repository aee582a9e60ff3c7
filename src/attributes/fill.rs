//! Fill-on-selection: resynchronise a template's attribute values with a newly
//! selected attribute set.

use std::collections::HashSet;

use serde::Serialize;

use super::value::{AttributeRef, TypedValue};

/// An attribute set as needed for recomputing attached values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSetSnapshot {
    pub id: i32,
    pub name: String,
    pub use_templates: bool,
    pub fill_on_selection: bool,
    pub attributes: Vec<AttributeRef>,
}

impl AttributeSetSnapshot {
    pub fn contains(&self, attribute_id: i32) -> bool {
        self.attributes.iter().any(|a| a.id == attribute_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillOutcome {
    /// Existing rows whose attribute is still in the set, in their original order
    pub kept: Vec<TypedValue>,
    /// New rows for attributes that had no value yet, in set order
    pub added: Vec<TypedValue>,
    /// Existing rows whose attribute left the set
    pub dropped: Vec<TypedValue>,
}

impl FillOutcome {
    /// Resulting value collection
    pub fn values(&self) -> Vec<TypedValue> {
        self.kept.iter().chain(self.added.iter()).cloned().collect()
    }

    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }
}

/// Recompute `current` (the template-level rows of `template_id`) against `set`.
///
/// Returns `None` when the set does not fill on selection; the caller then
/// leaves the attached rows untouched.
pub fn fill_on_selection(
    template_id: i32,
    current: Vec<TypedValue>,
    set: &AttributeSetSnapshot,
) -> Option<FillOutcome> {
    if !set.fill_on_selection {
        return None;
    }

    let present: HashSet<i32> = current.iter().filter_map(|v| v.attribute_id()).collect();

    let mut outcome = FillOutcome::default();
    for mut row in current {
        match row.attribute_id() {
            Some(id) if !set.contains(id) => outcome.dropped.push(row),
            _ => {
                row.attribute_set_id = Some(set.id);
                outcome.kept.push(row);
            }
        }
    }

    outcome.added = set
        .attributes
        .iter()
        .filter(|a| !present.contains(&a.id))
        .map(|a| TypedValue::draft(template_id, Some(set.id), a.clone()))
        .collect();

    Some(outcome)
}
