use sea_orm_migration::prelude::*;

mod m001_create_catalog_tables;
mod m002_create_attribute_tables;
mod m003_create_attribute_values;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_catalog_tables::Migration),
            Box::new(m002_create_attribute_tables::Migration),
            Box::new(m003_create_attribute_values::Migration),
        ]
    }
}
