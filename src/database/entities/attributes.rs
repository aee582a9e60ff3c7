use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeRef, AttributeType};
use crate::errors::AttributeResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub display_name: Option<String>,
    pub attribute_type: String, // AttributeType tag
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attribute_selection_options::Entity")]
    SelectionOptions,
    #[sea_orm(has_many = "super::attribute_set_attributes::Entity")]
    AttributeSetAttributes,
    #[sea_orm(has_many = "super::attribute_values::Entity")]
    AttributeValues,
}

impl Related<super::attribute_selection_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelectionOptions.def()
    }
}

impl Related<super::attribute_set_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSetAttributes.def()
    }
}

impl Related<super::attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeValues.def()
    }
}

impl Related<super::attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        super::attribute_set_attributes::Relation::AttributeSets.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::attribute_set_attributes::Relation::Attributes.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn kind(&self) -> AttributeResult<AttributeType> {
        self.attribute_type.parse()
    }

    /// Display name when set, otherwise the name
    pub fn rec_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.name)
    }

    pub fn to_ref(&self) -> AttributeResult<AttributeRef> {
        Ok(AttributeRef {
            id: self.id,
            name: self.name.clone(),
            attribute_type: self.kind()?,
        })
    }
}
