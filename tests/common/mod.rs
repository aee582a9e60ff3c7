#![allow(dead_code)]

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::NamedTempFile;

use product_attributes::attributes::AttributeType;
use product_attributes::database::entities::{attribute_selection_options, attribute_sets, attributes};
use product_attributes::database::setup_database;
use product_attributes::services::{AttributeService, AttributeSetService, NewAttribute, NewAttributeSet};

/// In-memory database with migrations applied. A single connection keeps every query on the same database.
pub async fn setup_memory_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await?;
    setup_database(&db).await?;
    Ok(db)
}

pub async fn setup_file_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

/// Attributes A (char), B (integer), C (boolean), Color (selection with two
/// options) and sets S1 = {A, B, Color}, S2 = {B, C}, both filling on selection
pub struct Catalog {
    pub a: attributes::Model,
    pub b: attributes::Model,
    pub c: attributes::Model,
    pub color: attributes::Model,
    pub red: attribute_selection_options::Model,
    pub blue: attribute_selection_options::Model,
    pub s1: attribute_sets::Model,
    pub s2: attribute_sets::Model,
}

pub async fn build_catalog(db: &DatabaseConnection) -> Result<Catalog> {
    let attributes = AttributeService::new(db.clone());
    let sets = AttributeSetService::new(db.clone());

    let a = attributes.create(NewAttribute::new("A", AttributeType::Char)).await?;
    let b = attributes.create(NewAttribute::new("B", AttributeType::Integer)).await?;
    let c = attributes.create(NewAttribute::new("C", AttributeType::Boolean)).await?;
    let color = attributes.create(NewAttribute::new("Color", AttributeType::Selection)).await?;
    let red = attributes.add_option(color.id, "Red").await?;
    let blue = attributes.add_option(color.id, "Blue").await?;

    let s1 = sets.create(NewAttributeSet::new("S1").fill_on_selection(true)).await?;
    for attribute in [&a, &b, &color] {
        sets.add_attribute(s1.id, attribute.id).await?;
    }
    let s2 = sets.create(NewAttributeSet::new("S2").fill_on_selection(true)).await?;
    for attribute in [&b, &c] {
        sets.add_attribute(s2.id, attribute.id).await?;
    }

    Ok(Catalog {
        a,
        b,
        c,
        color,
        red,
        blue,
        s1,
        s2,
    })
}
