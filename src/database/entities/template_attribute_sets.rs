use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attribute set chosen for a product template, keyed by the template
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template_attribute_sets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub template_id: i32,
    pub attribute_set_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_templates::Entity",
        from = "Column::TemplateId",
        to = "super::product_templates::Column::Id",
        on_delete = "Cascade"
    )]
    ProductTemplates,
    #[sea_orm(
        belongs_to = "super::attribute_sets::Entity",
        from = "Column::AttributeSetId",
        to = "super::attribute_sets::Column::Id",
        on_delete = "Restrict"
    )]
    AttributeSets,
}

impl Related<super::product_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTemplates.def()
    }
}

impl Related<super::attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
