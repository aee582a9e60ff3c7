use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::attributes::duplication::ValueRecord;
use crate::attributes::ValueColumns;

/// Typed value of one attribute for a template (`product_id` unset) or a product variant.
/// Only the column matching the attribute type is populated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attribute_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub template_id: i32,
    pub product_id: Option<i32>,
    pub attribute_id: i32,
    pub value_char: Option<String>,
    pub value_numeric: Option<String>, // decimal text
    pub value_float: Option<f64>,
    pub value_selection: Option<i32>,
    pub value_boolean: Option<bool>,
    pub value_integer: Option<i64>,
    pub value_date: Option<ChronoDate>,
    pub value_datetime: Option<ChronoDateTime>, // UTC
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
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::attributes::Entity",
        from = "Column::AttributeId",
        to = "super::attributes::Column::Id",
        on_delete = "Restrict"
    )]
    Attributes,
    #[sea_orm(
        belongs_to = "super::attribute_selection_options::Entity",
        from = "Column::ValueSelection",
        to = "super::attribute_selection_options::Column::Id",
        on_delete = "Restrict"
    )]
    SelectionOptions,
}

impl Related<super::product_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTemplates.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl Related<super::attribute_selection_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelectionOptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn columns(&self) -> ValueColumns {
        ValueColumns {
            value_char: self.value_char.clone(),
            value_numeric: self.value_numeric.clone(),
            value_float: self.value_float,
            value_selection: self.value_selection,
            value_boolean: self.value_boolean,
            value_integer: self.value_integer,
            value_date: self.value_date,
            value_datetime: self.value_datetime,
        }
    }

    pub fn to_record(&self) -> ValueRecord {
        ValueRecord {
            template_id: self.template_id,
            product_id: self.product_id,
            attribute_id: self.attribute_id,
            columns: self.columns(),
        }
    }
}

impl ActiveModel {
    /// Write every value column, clearing the ones not populated in `columns`
    pub fn set_columns(&mut self, columns: ValueColumns) {
        self.value_char = Set(columns.value_char);
        self.value_numeric = Set(columns.value_numeric);
        self.value_float = Set(columns.value_float);
        self.value_selection = Set(columns.value_selection);
        self.value_boolean = Set(columns.value_boolean);
        self.value_integer = Set(columns.value_integer);
        self.value_date = Set(columns.value_date);
        self.value_datetime = Set(columns.value_datetime);
    }

    pub fn from_record(record: ValueRecord) -> Self {
        let mut active = ActiveModel {
            template_id: Set(record.template_id),
            product_id: Set(record.product_id),
            attribute_id: Set(record.attribute_id),
            ..Default::default()
        };
        active.set_columns(record.columns);
        active
    }
}
