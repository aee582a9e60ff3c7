use chrono::NaiveDate;
use sea_orm::*;
use tracing::info;

use crate::attributes::{AttributeType, AttributeValue, SelectionChoice};
use crate::database::entities::attribute_sets;
use crate::errors::AttributeResult;
use crate::services::{
    AttributeService, AttributeSetService, AttributeValueService, CatalogService, NewAttribute, NewAttributeSet,
    ValueOwner,
};

pub const EXAMPLE_SET_NAME: &str = "Apparel";

/// Example catalog: an "Apparel" set with five attributes and two field
/// templates, and a T-shirt template with three variants
pub async fn create_example_catalog(db: &DatabaseConnection) -> AttributeResult<()> {
    let existing = attribute_sets::Entity::find()
        .filter(attribute_sets::Column::Name.eq(EXAMPLE_SET_NAME))
        .one(db)
        .await?;
    if existing.is_some() {
        info!("Example catalog already exists, skipping seed data creation");
        return Ok(());
    }

    info!("Creating example catalog: {}", EXAMPLE_SET_NAME);

    let attributes = AttributeService::new(db.clone());
    let sets = AttributeSetService::new(db.clone());
    let catalog = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    let color = attributes
        .create(NewAttribute::new("Color", AttributeType::Selection).with_display_name("Colour"))
        .await?;
    let mut colors = Vec::new();
    for name in ["Red", "Blue", "Black"] {
        colors.push(attributes.add_option(color.id, name).await?);
    }
    let size = attributes.create(NewAttribute::new("Size", AttributeType::Char)).await?;
    let weight = attributes
        .create(NewAttribute::new("Weight", AttributeType::Numeric).with_display_name("Weight (kg)"))
        .await?;
    let organic = attributes.create(NewAttribute::new("Organic", AttributeType::Boolean)).await?;
    let released = attributes.create(NewAttribute::new("Released", AttributeType::Date)).await?;

    let apparel = sets
        .create(NewAttributeSet::new(EXAMPLE_SET_NAME).use_templates(true).fill_on_selection(true))
        .await?;
    for attribute in [&color, &size, &weight, &organic, &released] {
        sets.add_attribute(apparel.id, attribute.id).await?;
    }
    sets.add_field_template(apparel.id, "template,name", "{{#if (stringeq Organic \"true\")}}Organic {{/if}}T-Shirt", Some(10))
        .await?;
    sets.add_field_template(apparel.id, "product,code", "TS-{{upper Color}}-{{Size}}", Some(20))
        .await?;

    let template = catalog.create_template("T-Shirt").await?;
    let assignment = catalog.assign_attribute_set(template.id, Some(apparel.id)).await?;
    info!(
        "Filled {} attribute values on template {}",
        assignment.fill.map(|f| f.added.len()).unwrap_or(0),
        template.id
    );

    for row in values.template_values(template.id).await? {
        let (Some(id), Some(name)) = (row.id, row.attribute_name()) else {
            continue;
        };
        let value = match name {
            "Weight" => Some(AttributeValue::Numeric("0.180".parse().unwrap_or_default())),
            "Organic" => Some(AttributeValue::Boolean(true)),
            "Released" => NaiveDate::from_ymd_opt(2024, 3, 1).map(AttributeValue::Date),
            _ => continue,
        };
        values.set_value(id, value).await?;
    }

    for (option, size_label) in colors.iter().zip(["S", "M", "L"]) {
        let product = catalog.create_product(template.id, None).await?;
        values
            .attach(
                ValueOwner::Product(product.id),
                color.id,
                Some(AttributeValue::Selection(SelectionChoice::by_id(option.id))),
            )
            .await?;
        values
            .attach(
                ValueOwner::Product(product.id),
                size.id,
                Some(AttributeValue::Char(size_label.to_string())),
            )
            .await?;
    }

    info!("Successfully created example catalog with template {}", template.id);
    Ok(())
}
