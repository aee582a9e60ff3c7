use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::attribute_values::Entity")]
    AttributeValues,
    #[sea_orm(has_one = "super::template_attribute_sets::Entity")]
    TemplateAttributeSets,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeValues.def()
    }
}

impl Related<super::template_attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateAttributeSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Object exposed as `record` to field template expressions
    pub fn render_record(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
        })
    }
}
