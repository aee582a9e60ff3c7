use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per template that has an attribute set
        manager
            .create_table(
                Table::create()
                    .table(TemplateAttributeSets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TemplateAttributeSets::TemplateId).integer().not_null().primary_key())
                    .col(ColumnDef::new(TemplateAttributeSets::AttributeSetId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_attribute_sets_template_id")
                            .from(TemplateAttributeSets::Table, TemplateAttributeSets::TemplateId)
                            .to(ProductTemplates::Table, ProductTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_attribute_sets_attribute_set_id")
                            .from(TemplateAttributeSets::Table, TemplateAttributeSets::AttributeSetId)
                            .to(AttributeSets::Table, AttributeSets::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttributeValues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttributeValues::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AttributeValues::TemplateId).integer().not_null())
                    .col(ColumnDef::new(AttributeValues::ProductId).integer())
                    .col(ColumnDef::new(AttributeValues::AttributeId).integer().not_null())
                    .col(ColumnDef::new(AttributeValues::ValueChar).text())
                    .col(ColumnDef::new(AttributeValues::ValueNumeric).text())
                    .col(ColumnDef::new(AttributeValues::ValueFloat).double())
                    .col(ColumnDef::new(AttributeValues::ValueSelection).integer())
                    .col(ColumnDef::new(AttributeValues::ValueBoolean).boolean())
                    .col(ColumnDef::new(AttributeValues::ValueInteger).big_integer())
                    .col(ColumnDef::new(AttributeValues::ValueDate).date())
                    .col(ColumnDef::new(AttributeValues::ValueDatetime).date_time())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_values_template_id")
                            .from(AttributeValues::Table, AttributeValues::TemplateId)
                            .to(ProductTemplates::Table, ProductTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_values_product_id")
                            .from(AttributeValues::Table, AttributeValues::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_values_attribute_id")
                            .from(AttributeValues::Table, AttributeValues::AttributeId)
                            .to(Attributes::Table, Attributes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_values_value_selection")
                            .from(AttributeValues::Table, AttributeValues::ValueSelection)
                            .to(AttributeSelectionOptions::Table, AttributeSelectionOptions::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_template_attribute_sets_attribute_set_id")
                    .table(TemplateAttributeSets::Table)
                    .col(TemplateAttributeSets::AttributeSetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_values_template_id")
                    .table(AttributeValues::Table)
                    .col(AttributeValues::TemplateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_values_product_id")
                    .table(AttributeValues::Table)
                    .col(AttributeValues::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_values_attribute_id")
                    .table(AttributeValues::Table)
                    .col(AttributeValues::AttributeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttributeValues::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TemplateAttributeSets::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TemplateAttributeSets {
    Table,
    TemplateId,
    AttributeSetId,
}

#[derive(DeriveIden)]
enum AttributeValues {
    Table,
    Id,
    TemplateId,
    ProductId,
    AttributeId,
    ValueChar,
    ValueNumeric,
    ValueFloat,
    ValueSelection,
    ValueBoolean,
    ValueInteger,
    ValueDate,
    ValueDatetime,
}

#[derive(DeriveIden)]
enum ProductTemplates {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Attributes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AttributeSets {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AttributeSelectionOptions {
    Table,
    Id,
}
