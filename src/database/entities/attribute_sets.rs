use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attribute_sets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub use_templates: bool,
    pub fill_on_selection: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attribute_set_attributes::Entity")]
    AttributeSetAttributes,
    #[sea_orm(has_many = "super::field_templates::Entity")]
    FieldTemplates,
    #[sea_orm(has_many = "super::template_attribute_sets::Entity")]
    TemplateAttributeSets,
}

impl Related<super::attribute_set_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSetAttributes.def()
    }
}

impl Related<super::field_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FieldTemplates.def()
    }
}

impl Related<super::template_attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateAttributeSets.def()
    }
}

impl Related<super::attributes::Entity> for Entity {
    fn to() -> RelationDef {
        super::attribute_set_attributes::Relation::Attributes.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::attribute_set_attributes::Relation::AttributeSets.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
