//! Rendering field templates onto templates and products
#![cfg(feature = "templating")]

mod common;

use anyhow::Result;
use product_attributes::attributes::{AccessContext, AttributeValue, SelectionChoice, UserContext};
use product_attributes::errors::{AttributeError, TemplateError};
use product_attributes::services::{
    AttributeSetService, AttributeSetUpdate, AttributeValueService, CatalogService, TemplateDerivationService,
    ValueOwner,
};

use common::{build_catalog, setup_memory_db, Catalog};

struct Shop {
    catalog: Catalog,
    template_id: i32,
    red: i32,
    blue: i32,
}

/// Template in S1 with templates enabled, A = "tee", two products colored red and blue
async fn build_shop(db: &sea_orm::DatabaseConnection) -> Result<Shop> {
    let catalog = build_catalog(db).await?;
    let sets = AttributeSetService::new(db.clone());
    let templates = CatalogService::new(db.clone());
    let values = AttributeValueService::new(db.clone());

    sets.update(
        catalog.s1.id,
        AttributeSetUpdate {
            use_templates: Some(true),
            ..Default::default()
        },
    )
    .await?;
    sets.add_field_template(catalog.s1.id, "product,code", "{{upper A}}-{{Color}}-{{B}}", Some(20))
        .await?;
    sets.add_field_template(catalog.s1.id, "template,name", "{{A}} shirt", Some(10))
        .await?;

    let template = templates.create_template("Draft").await?;
    templates.assign_attribute_set(template.id, Some(catalog.s1.id)).await?;
    for row in values.template_values(template.id).await? {
        let id = row.id.expect("stored");
        match row.attribute_name() {
            Some("A") => {
                values.set_value(id, Some(AttributeValue::Char("tee".to_string()))).await?;
            }
            Some("B") => {
                values.set_value(id, Some(AttributeValue::Integer(3))).await?;
            }
            _ => {}
        }
    }

    let red = templates.create_product(template.id, None).await?;
    values
        .attach(
            ValueOwner::Product(red.id),
            catalog.color.id,
            Some(AttributeValue::Selection(SelectionChoice::by_id(catalog.red.id))),
        )
        .await?;
    let blue = templates.create_product(template.id, None).await?;
    values
        .attach(
            ValueOwner::Product(blue.id),
            catalog.color.id,
            Some(AttributeValue::Selection(SelectionChoice::by_id(catalog.blue.id))),
        )
        .await?;

    Ok(Shop {
        catalog,
        template_id: template.id,
        red: red.id,
        blue: blue.id,
    })
}

#[tokio::test]
async fn test_update_values_renders_templates_and_products() -> Result<()> {
    let db = setup_memory_db().await?;
    let shop = build_shop(&db).await?;
    let derivation = TemplateDerivationService::new(db.clone());
    let templates = CatalogService::new(db.clone());

    let outcome = derivation
        .update_template_values(shop.template_id, &AccessContext::anonymous())
        .await?;

    assert_eq!(outcome.template.name, "tee shirt");
    let codes: Vec<_> = outcome.products.iter().map(|p| (p.id, p.code.clone())).collect();
    assert_eq!(
        codes,
        vec![
            (shop.red, Some("TEE-Red-3".to_string())),
            (shop.blue, Some("TEE-Blue-3".to_string())),
        ]
    );

    assert_eq!(templates.get_template(shop.template_id).await?.name, "tee shirt");
    assert_eq!(
        templates.get_product(shop.blue).await?.code.as_deref(),
        Some("TEE-Blue-3")
    );

    Ok(())
}

#[tokio::test]
async fn test_update_values_is_idempotent() -> Result<()> {
    let db = setup_memory_db().await?;
    let shop = build_shop(&db).await?;
    let derivation = TemplateDerivationService::new(db.clone());
    let access = AccessContext::anonymous();

    let first = derivation.update_template_values(shop.template_id, &access).await?;
    let second = derivation.update_template_values(shop.template_id, &access).await?;

    assert_eq!(first.template.name, second.template.name);
    let codes = |o: &product_attributes::services::DerivationOutcome| {
        o.products.iter().map(|p| p.code.clone()).collect::<Vec<_>>()
    };
    assert_eq!(codes(&first), codes(&second));
    assert_eq!(first.products.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_product_action_delegates_to_template() -> Result<()> {
    let db = setup_memory_db().await?;
    let shop = build_shop(&db).await?;
    let derivation = TemplateDerivationService::new(db.clone());

    let outcome = derivation
        .update_product_values(shop.red, &AccessContext::anonymous())
        .await?;
    assert_eq!(outcome.template.id, shop.template_id);
    assert_eq!(outcome.products.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_no_op_without_use_templates() -> Result<()> {
    let db = setup_memory_db().await?;
    let shop = build_shop(&db).await?;
    let sets = AttributeSetService::new(db.clone());
    let templates = CatalogService::new(db.clone());
    let derivation = TemplateDerivationService::new(db.clone());

    sets.update(
        shop.catalog.s1.id,
        AttributeSetUpdate {
            use_templates: Some(false),
            ..Default::default()
        },
    )
    .await?;
    assert!(!templates.use_templates(shop.template_id).await?);
    assert!(templates.template_form_state(shop.template_id).await?.update_action.invisible);

    let outcome = derivation
        .update_template_values(shop.template_id, &AccessContext::anonymous())
        .await?;
    assert!(outcome.products.is_empty());
    assert_eq!(outcome.template.name, "Draft");

    let bare = templates.create_template("Bare").await?;
    let outcome = derivation
        .update_template_values(bare.id, &AccessContext::anonymous())
        .await?;
    assert!(outcome.products.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_context_exposes_record_and_user() -> Result<()> {
    let db = setup_memory_db().await?;
    let shop = build_shop(&db).await?;
    let sets = AttributeSetService::new(db.clone());
    let derivation = TemplateDerivationService::new(db.clone());

    for ft in sets.list_field_templates(shop.catalog.s1.id).await? {
        sets.remove_field_template(ft.id).await?;
    }
    sets.add_field_template(
        shop.catalog.s1.id,
        "product,code",
        "{{record.id}}-{{#if user}}{{user.login}}{{else}}nobody{{/if}}",
        None,
    )
    .await?;

    let access = AccessContext::for_user(UserContext {
        id: 1,
        login: "admin".to_string(),
        name: "Administrator".to_string(),
    });
    let outcome = derivation.update_template_values(shop.template_id, &access).await?;
    assert_eq!(
        outcome.products[0].code,
        Some(format!("{}-admin", shop.red))
    );

    let outcome = derivation
        .update_template_values(shop.template_id, &AccessContext::anonymous())
        .await?;
    assert_eq!(
        outcome.products[1].code,
        Some(format!("{}-nobody", shop.blue))
    );

    Ok(())
}

#[tokio::test]
async fn test_field_template_validation() -> Result<()> {
    let db = setup_memory_db().await?;
    let catalog = build_catalog(&db).await?;
    let sets = AttributeSetService::new(db.clone());

    let err = sets
        .add_field_template(catalog.s1.id, "product.code", "{{A}}", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttributeError::Template(TemplateError::InvalidTarget(_))
    ));

    let err = sets
        .add_field_template(catalog.s1.id, "product,name", "{{A}}", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttributeError::Template(TemplateError::InvalidTarget(_))
    ));

    let err = sets
        .add_field_template(catalog.s1.id, "template,name", "{{#if A}}open{{/each}}", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttributeError::Template(TemplateError::InvalidExpression(_))
    ));

    let late = sets.add_field_template(catalog.s1.id, "template,name", "{{A}}", Some(30)).await?;
    let early = sets.add_field_template(catalog.s1.id, "product,code", "{{B}}", Some(5)).await?;
    let ids: Vec<i32> = sets
        .list_field_templates(catalog.s1.id)
        .await?
        .iter()
        .map(|ft| ft.id)
        .collect();
    assert_eq!(ids, vec![early.id, late.id]);

    Ok(())
}
