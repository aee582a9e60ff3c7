//! Administration of attributes, options and attribute sets

mod common;

use anyhow::Result;
use product_attributes::attributes::{AttributeType, AttributeValue, SelectionChoice};
use product_attributes::database::seed_data;
use product_attributes::errors::AttributeError;
use product_attributes::services::{
    AttributeService, AttributeSetService, AttributeUpdate, AttributeValueService, CatalogService, NewAttribute,
    NewAttributeSet, ValueOwner,
};

use common::{build_catalog, setup_file_db, setup_memory_db};

#[tokio::test]
async fn test_create_attribute_defaults() -> Result<()> {
    let db = setup_memory_db().await?;
    let attributes = AttributeService::new(db.clone());

    let plain = attributes.create(NewAttribute::new("Material", AttributeType::default())).await?;
    assert_eq!(plain.attribute_type, "char");
    assert_eq!(attributes.rec_name(plain.id).await?, "Material");

    let named = attributes
        .create(NewAttribute::new("Weight", AttributeType::Numeric).with_display_name("Weight (kg)"))
        .await?;
    assert_eq!(attributes.rec_name(named.id).await?, "Weight (kg)");

    let blank = attributes
        .create(NewAttribute::new("   ", AttributeType::Char))
        .await
        .unwrap_err();
    assert!(matches!(blank, AttributeError::Validation(_)));
    let reserved = attributes
        .create(NewAttribute::new("record", AttributeType::Char))
        .await
        .unwrap_err();
    assert!(matches!(reserved, AttributeError::Validation(_)));

    attributes.create(NewAttribute::new("Shoe size", AttributeType::Char)).await?;
    attributes.create(NewAttribute::new("Größe", AttributeType::Char)).await?;

    let listed: Vec<_> = attributes.list().await?.into_iter().map(|a| a.name).collect();
    assert_eq!(listed, vec!["Größe", "Material", "Shoe size", "Weight"]);

    Ok(())
}

#[tokio::test]
async fn test_options_only_on_selection_attributes() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let attributes = AttributeService::new(db.clone());

    let err = attributes.add_option(catalog.a.id, "Nope").await.unwrap_err();
    assert!(matches!(err, AttributeError::SelectionNotAllowed(_)));

    let names: Vec<_> = attributes
        .list_options(catalog.color.id)
        .await?
        .into_iter()
        .map(|o| o.name)
        .collect();
    assert_eq!(names, vec!["Red", "Blue"]);

    assert!(!attributes.options_state(catalog.color.id).await?.invisible);
    assert!(attributes.options_state(catalog.a.id).await?.invisible);

    let sets = AttributeSetService::new(db.clone());
    assert!(sets.field_templates_state(catalog.s1.id).await?.invisible);

    Ok(())
}

#[tokio::test]
async fn test_type_change_rules() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let attributes = AttributeService::new(db.clone());
    let templates = CatalogService::new(db.clone());

    // Options block a change away from selection
    let err = attributes
        .update(
            catalog.color.id,
            AttributeUpdate {
                attribute_type: Some(AttributeType::Char),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AttributeError::Validation(_)));

    // No values yet: free to change
    let changed = attributes
        .update(
            catalog.c.id,
            AttributeUpdate {
                attribute_type: Some(AttributeType::Integer),
                display_name: Some(Some("Count".to_string())),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(changed.attribute_type, "integer");
    assert_eq!(changed.display_name.as_deref(), Some("Count"));

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    let err = attributes
        .update(
            catalog.b.id,
            AttributeUpdate {
                attribute_type: Some(AttributeType::Float),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AttributeError::InUse(_)));

    // Renaming is always allowed
    let renamed = attributes
        .update(
            catalog.b.id,
            AttributeUpdate {
                name: Some("Quantity".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(renamed.name, "Quantity");

    Ok(())
}

#[tokio::test]
async fn test_delete_attribute_in_use_is_refused() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let attributes = AttributeService::new(db.clone());
    let sets = AttributeSetService::new(db.clone());
    let templates = CatalogService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;

    let err = attributes.delete(catalog.b.id).await.unwrap_err();
    assert_eq!(err.error_code(), "RECORD_IN_USE");

    // Unused: options and set links go with it
    attributes.delete(catalog.color.id).await?;
    assert!(attributes.get(catalog.color.id).await.unwrap_err().is_not_found());
    let remaining: Vec<_> = sets.attributes(catalog.s1.id).await?.into_iter().map(|a| a.id).collect();
    assert_eq!(remaining, vec![catalog.a.id, catalog.b.id]);

    Ok(())
}

#[tokio::test]
async fn test_remove_selected_option_is_refused() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let attributes = AttributeService::new(db.clone());
    let templates = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s1.id)).await?;
    let product = templates.create_product(template.id, None).await?;
    values
        .attach(
            ValueOwner::Product(product.id),
            catalog.color.id,
            Some(AttributeValue::Selection(SelectionChoice::by_id(catalog.red.id))),
        )
        .await?;

    let err = attributes.remove_option(catalog.red.id).await.unwrap_err();
    assert!(matches!(err, AttributeError::InUse(_)));

    attributes.remove_option(catalog.blue.id).await?;
    assert_eq!(attributes.list_options(catalog.color.id).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_set_links_and_membership() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let attributes = AttributeService::new(db.clone());
    let sets = AttributeSetService::new(db.clone());

    assert!(!sets.add_attribute(catalog.s1.id, catalog.a.id).await?);
    assert!(sets.add_attribute(catalog.s1.id, catalog.c.id).await?);

    let of_b: Vec<_> = attributes
        .attribute_sets(catalog.b.id)
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(of_b, vec!["S1", "S2"]);

    assert!(sets.remove_attribute(catalog.s1.id, catalog.c.id).await?);
    assert!(!sets.remove_attribute(catalog.s1.id, catalog.c.id).await?);

    let snapshot = sets.snapshot(catalog.s1.id).await?;
    assert!(snapshot.fill_on_selection);
    let ids: Vec<_> = snapshot.attributes.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![catalog.a.id, catalog.b.id, catalog.color.id]);

    Ok(())
}

#[tokio::test]
async fn test_delete_assigned_set_is_refused() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let sets = AttributeSetService::new(db.clone());
    let templates = CatalogService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    assert!(matches!(
        sets.delete(catalog.s2.id).await.unwrap_err(),
        AttributeError::InUse(_)
    ));

    let spare = sets.create(NewAttributeSet::new("Spare").use_templates(true)).await?;
    sets.add_attribute(spare.id, catalog.a.id).await?;
    sets.delete(spare.id).await?;
    assert!(sets.get(spare.id).await.unwrap_err().is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_product_inherits_template_set() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    let product = templates.create_product(template.id, None).await?;
    assert!(templates.product_attribute_set(product.id).await?.is_none());

    templates.assign_attribute_set(template.id, Some(catalog.s1.id)).await?;
    assert_eq!(
        templates.product_attribute_set(product.id).await?.map(|s| s.id),
        Some(catalog.s1.id)
    );
    let state = templates.product_form_state(product.id).await?;
    assert!(!state.attribute_values.readonly);

    Ok(())
}

#[tokio::test]
async fn test_attribute_usage_reads_product_then_template_rows() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let templates = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    let template = templates.create_template("Shirt").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s2.id)).await?;
    let product = templates.create_product(template.id, None).await?;
    values
        .attach(ValueOwner::Product(product.id), catalog.b.id, Some(AttributeValue::Integer(1)))
        .await?;

    let access = product_attributes::attributes::AccessContext::anonymous();
    let usage = templates.product_attribute_usage(product.id, &access.elevate()).await?;
    assert_eq!(usage.len(), 3);
    assert_eq!(usage[0].product_id, Some(product.id));
    assert!(usage[1..].iter().all(|v| v.is_template_level()));

    Ok(())
}

#[tokio::test]
async fn test_seed_is_idempotent() -> Result<()> {
    let (db, _temp_file) = setup_file_db().await?;

    seed_data::create_example_catalog(&db).await?;
    seed_data::create_example_catalog(&db).await?;

    let sets = AttributeSetService::new(db.clone());
    let listed = sets.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(sets.attributes(listed[0].id).await?.len(), 5);
    assert_eq!(sets.list_field_templates(listed[0].id).await?.len(), 2);

    let templates = CatalogService::new(db.clone());
    let shirts = templates.list_templates().await?;
    assert_eq!(shirts.len(), 1);
    assert_eq!(templates.products_of_template(shirts[0].id).await?.len(), 3);

    Ok(())
}
