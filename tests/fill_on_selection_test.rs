//! Attribute set changes resynchronising template-level values

mod common;

use anyhow::Result;
use product_attributes::attributes::{AttributeValue, SelectionChoice};
use product_attributes::database::entities::attribute_values;
use product_attributes::services::{
    AttributeSetService, AttributeSetUpdate, AttributeValueService, CatalogService, ValueOwner,
};
use sea_orm::EntityTrait;

use common::{build_catalog, setup_memory_db};

fn attribute_ids(values: &[product_attributes::attributes::TypedValue]) -> Vec<i32> {
    let mut ids: Vec<i32> = values.iter().filter_map(|v| v.attribute_id()).collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_switching_sets_keeps_shared_and_fills_missing() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    let first = templates.assign_attribute_set(template.id, Some(catalog.s1.id)).await?;
    assert!(first.changed());
    assert_eq!(first.fill.as_ref().map(|f| f.added.len()), Some(3));

    let b = values
        .template_values(template.id)
        .await?
        .into_iter()
        .find(|v| v.attribute_id() == Some(catalog.b.id))
        .expect("B filled");
    let b_id = b.id.expect("stored");
    values.set_value(b_id, Some(AttributeValue::Integer(7))).await?;

    let second = templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    let outcome = second.fill.expect("S2 fills on selection");
    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.added.len(), 1);
    assert_eq!(outcome.dropped.len(), 2);

    let current = values.template_values(template.id).await?;
    assert_eq!(attribute_ids(&current), {
        let mut ids = vec![catalog.b.id, catalog.c.id];
        ids.sort();
        ids
    });

    let kept = current.iter().find(|v| v.id == Some(b_id)).expect("B preserved");
    assert_eq!(kept.value, Some(AttributeValue::Integer(7)));
    assert_eq!(kept.attribute_set_id, Some(catalog.s2.id));

    let added = current
        .iter()
        .find(|v| v.attribute_id() == Some(catalog.c.id))
        .expect("C added");
    assert_eq!(added.value, Some(AttributeValue::Boolean(false)));

    Ok(())
}

#[tokio::test]
async fn test_reassigning_same_set_changes_nothing() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    let before = values.template_values(template.id).await?;

    let again = templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    assert!(!again.changed());
    assert!(again.fill.is_none());
    assert_eq!(values.template_values(template.id).await?, before);

    Ok(())
}

#[tokio::test]
async fn test_set_without_fill_leaves_values() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());
    let sets = AttributeSetService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    sets.update(
        catalog.s2.id,
        AttributeSetUpdate {
            fill_on_selection: Some(false),
            ..Default::default()
        },
    )
    .await?;

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s1.id)).await?;
    let before = attribute_ids(&values.template_values(template.id).await?);

    let assignment = templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    assert!(assignment.changed());
    assert!(assignment.fill.is_none());
    assert_eq!(attribute_ids(&values.template_values(template.id).await?), before);

    Ok(())
}

#[tokio::test]
async fn test_product_values_are_not_refilled() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s1.id)).await?;
    let product = templates.create_product(template.id, Some("SH-RED".to_string())).await?;
    values
        .attach(
            ValueOwner::Product(product.id),
            catalog.color.id,
            Some(AttributeValue::Selection(SelectionChoice::by_id(catalog.red.id))),
        )
        .await?;

    templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;

    let own = values.product_values(product.id).await?;
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].attribute_id(), Some(catalog.color.id));
    assert_eq!(own[0].attribute_set_id, Some(catalog.s2.id));

    Ok(())
}

#[tokio::test]
async fn test_preview_does_not_persist() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s1.id)).await?;
    let stored_before = attribute_values::Entity::find().all(&db).await?;

    let preview = templates
        .preview_attribute_set_change(template.id, Some(catalog.s2.id))
        .await?
        .expect("S2 fills on selection");
    assert_eq!(attribute_ids(&preview.values()), {
        let mut ids = vec![catalog.b.id, catalog.c.id];
        ids.sort();
        ids
    });
    assert!(preview.added.iter().all(|v| v.id.is_none()));

    assert_eq!(attribute_values::Entity::find().all(&db).await?, stored_before);
    assert_eq!(
        templates.template_attribute_set(template.id).await?.map(|s| s.id),
        Some(catalog.s1.id)
    );
    assert!(templates.preview_attribute_set_change(template.id, None).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_clearing_set_keeps_values_readonly() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    let cleared = templates.assign_attribute_set(template.id, None).await?;
    assert_eq!(cleared.previous, Some(catalog.s2.id));
    assert!(cleared.fill.is_none());

    assert_eq!(values.template_values(template.id).await?.len(), 2);
    let state = templates.template_form_state(template.id).await?;
    assert_eq!(state.attribute_set_id, None);
    assert!(state.attribute_values.readonly);
    assert!(state.update_action.invisible);

    Ok(())
}
