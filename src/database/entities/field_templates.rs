use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::attributes::FieldTarget;
use crate::errors::TemplateResult;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "field_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub attribute_set_id: i32,
    pub target_field: String, // "object,field"
    pub template_text: String,
    pub sequence: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attribute_sets::Entity",
        from = "Column::AttributeSetId",
        to = "super::attribute_sets::Column::Id",
        on_delete = "Cascade"
    )]
    AttributeSets,
}

impl Related<super::attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn target(&self) -> TemplateResult<FieldTarget> {
        self.target_field.parse()
    }
}
