use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TemplateError;

/// Record kind a field template writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetObject {
    Product,
    Template,
}

/// Field a field template renders into, stored as `object,field`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldTarget {
    #[serde(rename = "product,code")]
    ProductCode,
    #[serde(rename = "template,name")]
    TemplateName,
}

impl FieldTarget {
    pub const ALL: [FieldTarget; 2] = [FieldTarget::ProductCode, FieldTarget::TemplateName];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldTarget::ProductCode => "product,code",
            FieldTarget::TemplateName => "template,name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldTarget::ProductCode => "Code",
            FieldTarget::TemplateName => "Name",
        }
    }

    pub fn object(&self) -> TargetObject {
        match self {
            FieldTarget::ProductCode => TargetObject::Product,
            FieldTarget::TemplateName => TargetObject::Template,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            FieldTarget::ProductCode => "code",
            FieldTarget::TemplateName => "name",
        }
    }

    /// `(stored value, label)` pairs offered to administrators
    pub fn selection() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|t| (t.as_str(), t.label())).collect()
    }
}

impl fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldTarget {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        let [object, field] = parts.as_slice() else {
            return Err(TemplateError::InvalidTarget(s.to_string()));
        };

        match (object.trim(), field.trim()) {
            ("product", "code") => Ok(FieldTarget::ProductCode),
            ("template", "name") => Ok(FieldTarget::TemplateName),
            _ => Err(TemplateError::InvalidTarget(s.to_string())),
        }
    }
}
