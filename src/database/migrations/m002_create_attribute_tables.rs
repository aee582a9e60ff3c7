use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attributes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attributes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Attributes::Name).text().not_null())
                    .col(ColumnDef::new(Attributes::DisplayName).text())
                    .col(ColumnDef::new(Attributes::AttributeType).text().not_null().default("char"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttributeSelectionOptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttributeSelectionOptions::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AttributeSelectionOptions::AttributeId).integer().not_null())
                    .col(ColumnDef::new(AttributeSelectionOptions::Name).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_selection_options_attribute_id")
                            .from(AttributeSelectionOptions::Table, AttributeSelectionOptions::AttributeId)
                            .to(Attributes::Table, Attributes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttributeSets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttributeSets::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AttributeSets::Name).text().not_null())
                    .col(ColumnDef::new(AttributeSets::UseTemplates).boolean().not_null().default(false))
                    .col(ColumnDef::new(AttributeSets::FillOnSelection).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AttributeSetAttributes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AttributeSetAttributes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AttributeSetAttributes::AttributeId).integer().not_null())
                    .col(ColumnDef::new(AttributeSetAttributes::AttributeSetId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_set_attributes_attribute_id")
                            .from(AttributeSetAttributes::Table, AttributeSetAttributes::AttributeId)
                            .to(Attributes::Table, Attributes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attribute_set_attributes_attribute_set_id")
                            .from(AttributeSetAttributes::Table, AttributeSetAttributes::AttributeSetId)
                            .to(AttributeSets::Table, AttributeSets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FieldTemplates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FieldTemplates::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(FieldTemplates::AttributeSetId).integer().not_null())
                    .col(ColumnDef::new(FieldTemplates::TargetField).text().not_null())
                    .col(ColumnDef::new(FieldTemplates::TemplateText).text().not_null())
                    .col(ColumnDef::new(FieldTemplates::Sequence).integer().not_null().default(10))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_field_templates_attribute_set_id")
                            .from(FieldTemplates::Table, FieldTemplates::AttributeSetId)
                            .to(AttributeSets::Table, AttributeSets::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_set_attributes_unique")
                    .table(AttributeSetAttributes::Table)
                    .col(AttributeSetAttributes::AttributeId)
                    .col(AttributeSetAttributes::AttributeSetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attribute_selection_options_attribute_id")
                    .table(AttributeSelectionOptions::Table)
                    .col(AttributeSelectionOptions::AttributeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_field_templates_attribute_set_id")
                    .table(FieldTemplates::Table)
                    .col(FieldTemplates::AttributeSetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FieldTemplates::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AttributeSetAttributes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AttributeSets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AttributeSelectionOptions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Attributes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Attributes {
    Table,
    Id,
    Name,
    DisplayName,
    AttributeType,
}

#[derive(DeriveIden)]
enum AttributeSelectionOptions {
    Table,
    Id,
    AttributeId,
    Name,
}

#[derive(DeriveIden)]
enum AttributeSets {
    Table,
    Id,
    Name,
    UseTemplates,
    FillOnSelection,
}

#[derive(DeriveIden)]
enum AttributeSetAttributes {
    Table,
    Id,
    AttributeId,
    AttributeSetId,
}

#[derive(DeriveIden)]
enum FieldTemplates {
    Table,
    Id,
    AttributeSetId,
    TargetField,
    TemplateText,
    Sequence,
}
