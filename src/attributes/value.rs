use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::format::FormatPolicy;
use super::types::AttributeType;
use crate::errors::{AttributeError, AttributeResult};

/// Option picked for a selection attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChoice {
    pub id: i32,
    pub name: String,
}

impl SelectionChoice {
    /// Choice referencing an option by id; the name is resolved when the value is stored
    pub fn by_id(id: i32) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }
}

/// Concrete value of one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i64),
    Char(String),
    Float(f64),
    Numeric(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Selection(SelectionChoice),
}

impl AttributeValue {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::Boolean(_) => AttributeType::Boolean,
            AttributeValue::Integer(_) => AttributeType::Integer,
            AttributeValue::Char(_) => AttributeType::Char,
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::Numeric(_) => AttributeType::Numeric,
            AttributeValue::Date(_) => AttributeType::Date,
            AttributeValue::DateTime(_) => AttributeType::DateTime,
            AttributeValue::Selection(_) => AttributeType::Selection,
        }
    }

    /// Value given to a freshly attached attribute of type `ty`
    pub fn default_for(ty: AttributeType) -> Option<AttributeValue> {
        match ty {
            AttributeType::Boolean => Some(AttributeValue::Boolean(false)),
            _ => None,
        }
    }
}

/// Storage form of a value: one nullable column per attribute type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueColumns {
    pub value_char: Option<String>,
    pub value_numeric: Option<String>,
    pub value_float: Option<f64>,
    pub value_selection: Option<i32>,
    pub value_boolean: Option<bool>,
    pub value_integer: Option<i64>,
    pub value_date: Option<NaiveDate>,
    pub value_datetime: Option<NaiveDateTime>,
}

impl ValueColumns {
    /// Columns with only the slot matching `value` populated
    pub fn from_value(value: Option<&AttributeValue>) -> Self {
        let mut columns = Self::default();
        match value {
            None => {}
            Some(AttributeValue::Boolean(v)) => columns.value_boolean = Some(*v),
            Some(AttributeValue::Integer(v)) => columns.value_integer = Some(*v),
            Some(AttributeValue::Char(v)) => columns.value_char = Some(v.clone()),
            Some(AttributeValue::Float(v)) => columns.value_float = Some(*v),
            Some(AttributeValue::Numeric(v)) => columns.value_numeric = Some(v.to_string()),
            Some(AttributeValue::Date(v)) => columns.value_date = Some(*v),
            Some(AttributeValue::DateTime(v)) => columns.value_datetime = Some(*v),
            Some(AttributeValue::Selection(choice)) => columns.value_selection = Some(choice.id),
        }
        columns
    }

    /// Read the live column for `ty`; every other column is ignored
    pub fn decode(
        &self,
        ty: AttributeType,
        selection_name: Option<&str>,
    ) -> AttributeResult<Option<AttributeValue>> {
        let value = match ty {
            AttributeType::Boolean => self.value_boolean.map(AttributeValue::Boolean),
            AttributeType::Integer => self.value_integer.map(AttributeValue::Integer),
            AttributeType::Char => self.value_char.clone().map(AttributeValue::Char),
            AttributeType::Float => self.value_float.map(AttributeValue::Float),
            AttributeType::Numeric => match self.value_numeric.as_deref() {
                Some(raw) => Some(AttributeValue::Numeric(raw.parse::<Decimal>().map_err(
                    |e| AttributeError::Validation(format!("Stored numeric '{}' is invalid: {}", raw, e)),
                )?)),
                None => None,
            },
            AttributeType::Date => self.value_date.map(AttributeValue::Date),
            AttributeType::DateTime => self.value_datetime.map(AttributeValue::DateTime),
            AttributeType::Selection => self.value_selection.map(|id| {
                AttributeValue::Selection(SelectionChoice {
                    id,
                    name: selection_name.unwrap_or_default().to_string(),
                })
            }),
        };
        Ok(value)
    }
}

/// Attribute definition as seen from a typed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRef {
    pub id: i32,
    pub name: String,
    pub attribute_type: AttributeType,
}

/// One attribute value attached to a template (`product_id` unset) or to a product variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    /// Unset until the row is stored
    pub id: Option<i32>,
    pub template_id: i32,
    pub product_id: Option<i32>,
    pub attribute: Option<AttributeRef>,
    /// Projection of the owning template's attribute set
    pub attribute_set_id: Option<i32>,
    pub value: Option<AttributeValue>,
}

impl TypedValue {
    /// Unsaved template-level row for `attribute`, carrying the type's default value
    pub fn draft(template_id: i32, attribute_set_id: Option<i32>, attribute: AttributeRef) -> Self {
        let value = AttributeValue::default_for(attribute.attribute_type);
        Self {
            id: None,
            template_id,
            product_id: None,
            attribute: Some(attribute),
            attribute_set_id,
            value,
        }
    }

    pub fn attribute_type(&self) -> Option<AttributeType> {
        self.attribute.as_ref().map(|a| a.attribute_type)
    }

    pub fn attribute_id(&self) -> Option<i32> {
        self.attribute.as_ref().map(|a| a.id)
    }

    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute.as_ref().map(|a| a.name.as_str())
    }

    pub fn is_template_level(&self) -> bool {
        self.product_id.is_none()
    }

    pub fn columns(&self) -> ValueColumns {
        ValueColumns::from_value(self.value.as_ref())
    }

    /// Normalised display string; `None` while no attribute is linked
    pub fn display_value(&self, policy: &FormatPolicy) -> Option<String> {
        policy.display(self.attribute_type(), self.value.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn test_from_value_populates_single_column() {
        let columns = ValueColumns::from_value(Some(&AttributeValue::Numeric(numeric("12.50"))));
        assert_eq!(columns.value_numeric.as_deref(), Some("12.50"));
        assert_eq!(
            columns,
            ValueColumns {
                value_numeric: Some("12.50".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_decode_reads_only_live_column() {
        let columns = ValueColumns {
            value_char: Some("stale".to_string()),
            value_integer: Some(4),
            ..Default::default()
        };
        let value = columns.decode(AttributeType::Integer, None).unwrap();
        assert_eq!(value, Some(AttributeValue::Integer(4)));
    }

    #[test]
    fn test_decode_selection_uses_resolved_name() {
        let columns = ValueColumns {
            value_selection: Some(9),
            ..Default::default()
        };
        let value = columns.decode(AttributeType::Selection, Some("Red")).unwrap();
        assert_eq!(
            value,
            Some(AttributeValue::Selection(SelectionChoice {
                id: 9,
                name: "Red".to_string()
            }))
        );
    }

    #[test]
    fn test_decode_rejects_corrupt_numeric() {
        let columns = ValueColumns {
            value_numeric: Some("twelve".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            columns.decode(AttributeType::Numeric, None),
            Err(AttributeError::Validation(_))
        ));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            AttributeValue::default_for(AttributeType::Boolean),
            Some(AttributeValue::Boolean(false))
        );
        assert_eq!(AttributeValue::default_for(AttributeType::Char), None);
        assert_eq!(AttributeValue::default_for(AttributeType::Selection), None);
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(AttributeValue::Integer(3)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "integer", "value": 3}));
    }

    #[test]
    fn test_draft_without_attribute_has_no_type() {
        let mut row = TypedValue::draft(
            1,
            Some(2),
            AttributeRef {
                id: 5,
                name: "Organic".to_string(),
                attribute_type: AttributeType::Boolean,
            },
        );
        assert_eq!(row.value, Some(AttributeValue::Boolean(false)));
        row.attribute = None;
        assert_eq!(row.attribute_type(), None);
        assert_eq!(row.display_value(&FormatPolicy::default()), None);
    }
}
