use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductTemplates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProductTemplates::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(ProductTemplates::Name).text().not_null())
                    .col(ColumnDef::new(ProductTemplates::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(ProductTemplates::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Products::TemplateId).integer().not_null())
                    .col(ColumnDef::new(Products::Code).text())
                    .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Products::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_template_id")
                            .from(Products::Table, Products::TemplateId)
                            .to(ProductTemplates::Table, ProductTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_template_id")
                    .table(Products::Table)
                    .col(Products::TemplateId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProductTemplates::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ProductTemplates {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    TemplateId,
    Code,
    CreatedAt,
    UpdatedAt,
}
