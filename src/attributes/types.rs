use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AttributeError;

/// Primitive type of an attribute definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Boolean,
    Integer,
    #[default]
    Char,
    Float,
    Numeric,
    Date,
    DateTime,
    Selection,
}

impl AttributeType {
    pub const ALL: [AttributeType; 8] = [
        AttributeType::Boolean,
        AttributeType::Integer,
        AttributeType::Char,
        AttributeType::Float,
        AttributeType::Numeric,
        AttributeType::Date,
        AttributeType::DateTime,
        AttributeType::Selection,
    ];

    /// Stored tag
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Boolean => "boolean",
            AttributeType::Integer => "integer",
            AttributeType::Char => "char",
            AttributeType::Float => "float",
            AttributeType::Numeric => "numeric",
            AttributeType::Date => "date",
            AttributeType::DateTime => "datetime",
            AttributeType::Selection => "selection",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttributeType::Boolean => "Boolean",
            AttributeType::Integer => "Integer",
            AttributeType::Char => "Char",
            AttributeType::Float => "Float",
            AttributeType::Numeric => "Numeric",
            AttributeType::Date => "Date",
            AttributeType::DateTime => "DateTime",
            AttributeType::Selection => "Selection",
        }
    }

    /// Name of the `attribute_values` column holding values of this type
    pub fn value_column(&self) -> &'static str {
        match self {
            AttributeType::Boolean => "value_boolean",
            AttributeType::Integer => "value_integer",
            AttributeType::Char => "value_char",
            AttributeType::Float => "value_float",
            AttributeType::Numeric => "value_numeric",
            AttributeType::Date => "value_date",
            AttributeType::DateTime => "value_datetime",
            AttributeType::Selection => "value_selection",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeType {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| AttributeError::UnknownType(s.to_string()))
    }
}
