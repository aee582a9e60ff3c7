use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Many-to-many link between attributes and attribute sets
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attribute_set_attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub attribute_id: i32,
    pub attribute_set_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attributes::Entity",
        from = "Column::AttributeId",
        to = "super::attributes::Column::Id",
        on_delete = "Cascade"
    )]
    Attributes,
    #[sea_orm(
        belongs_to = "super::attribute_sets::Entity",
        from = "Column::AttributeSetId",
        to = "super::attribute_sets::Column::Id",
        on_delete = "Cascade"
    )]
    AttributeSets,
}

impl Related<super::attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl Related<super::attribute_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
