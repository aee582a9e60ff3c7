use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product variant of a template
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub template_id: i32,
    pub code: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
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
    #[sea_orm(has_many = "super::attribute_values::Entity")]
    AttributeValues,
}

impl Related<super::product_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTemplates.def()
    }
}

impl Related<super::attribute_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn render_record(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "template_id": self.template_id,
            "code": self.code,
        })
    }
}
