use chrono::Utc;
use sea_orm::*;
use tracing::{debug, info};

use crate::attributes::duplication::{rebind_product_values, rebind_template_values, IdMap, ValueRecord};
use crate::database::entities::{attribute_values, product_templates, products, template_attribute_sets};
use crate::errors::AttributeResult;

use super::attribute_service::find_attribute;
use super::attribute_value_service::{check_membership, product_rows};
use super::catalog_service::{find_product, find_template, template_products, template_set_id};

/// Template a duplicated product is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductCopyTarget {
    SameTemplate,
    /// A different template, typically a fresh copy of the original one
    Template(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCopy {
    pub template: product_templates::Model,
    pub products: Vec<products::Model>,
    pub templates: IdMap,
    pub product_map: IdMap,
    pub values_copied: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCopy {
    pub product: products::Model,
    pub values_copied: usize,
}

async fn insert_values<C: ConnectionTrait>(conn: &C, records: Vec<ValueRecord>) -> AttributeResult<usize> {
    let count = records.len();
    if count == 0 {
        return Ok(0);
    }
    attribute_values::Entity::insert_many(records.into_iter().map(attribute_values::ActiveModel::from_record))
        .exec(conn)
        .await?;
    Ok(count)
}

async fn copy_product<C: ConnectionTrait>(
    conn: &C,
    product: &products::Model,
    template_id: i32,
) -> AttributeResult<products::Model> {
    let now = Utc::now();
    Ok(products::ActiveModel {
        template_id: Set(template_id),
        code: Set(product.code.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?)
}

/// Copies templates and products together with their attribute values
#[derive(Clone)]
pub struct DuplicationService {
    db: DatabaseConnection,
}

impl DuplicationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Copy a template, its attribute set and its template-level values.
    /// With `with_variants` its products and their own values are copied onto the new template too.
    pub async fn duplicate_template(&self, template_id: i32, with_variants: bool) -> AttributeResult<TemplateCopy> {
        let txn = self.db.begin().await?;

        let original = find_template(&txn, template_id).await?;
        let now = Utc::now();
        let template = product_templates::ActiveModel {
            name: Set(original.name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(set_id) = template_set_id(&txn, template_id).await? {
            template_attribute_sets::ActiveModel {
                template_id: Set(template.id),
                attribute_set_id: Set(set_id),
            }
            .insert(&txn)
            .await?;
        }

        let mut templates = IdMap::new();
        templates.insert(original.id, template.id);

        let records: Vec<ValueRecord> = attribute_values::Entity::find()
            .filter(attribute_values::Column::TemplateId.eq(template_id))
            .order_by_asc(attribute_values::Column::Id)
            .all(&txn)
            .await?
            .iter()
            .map(attribute_values::Model::to_record)
            .collect();

        let mut values_copied = insert_values(&txn, rebind_template_values(&records, &templates)).await?;

        let mut product_map = IdMap::new();
        let mut copies = Vec::new();
        if with_variants {
            for product in template_products(&txn, template_id).await? {
                let copy = copy_product(&txn, &product, template.id).await?;
                product_map.insert(product.id, copy.id);
                copies.push(copy);
            }
            values_copied += insert_values(&txn, rebind_product_values(&records, &product_map, &templates)).await?;
        }

        txn.commit().await?;

        info!(
            "Duplicated template {} as {} with {} products and {} values",
            template_id,
            template.id,
            copies.len(),
            values_copied
        );
        Ok(TemplateCopy {
            template,
            products: copies,
            templates,
            product_map,
            values_copied,
        })
    }

    /// Copy a product. Its own values follow only when it moves to a different
    /// template; under the same template they would attach twice. Every copied
    /// attribute must belong to the target template's attribute set.
    pub async fn duplicate_product(&self, product_id: i32, target: ProductCopyTarget) -> AttributeResult<ProductCopy> {
        let txn = self.db.begin().await?;

        let original = find_product(&txn, product_id).await?;
        let forked = match target {
            ProductCopyTarget::Template(template_id) if template_id != original.template_id => {
                Some(find_template(&txn, template_id).await?.id)
            }
            _ => None,
        };

        let product = copy_product(&txn, &original, forked.unwrap_or(original.template_id)).await?;

        let values_copied = match forked {
            Some(new_template) => {
                let mut templates = IdMap::new();
                templates.insert(original.template_id, new_template);
                let mut product_map = IdMap::new();
                product_map.insert(original.id, product.id);

                let rows = product_rows(&txn, product_id).await?;
                for row in &rows {
                    let attribute = find_attribute(&txn, row.attribute_id).await?;
                    check_membership(&txn, new_template, &attribute).await?;
                }
                let records: Vec<ValueRecord> = rows.iter().map(attribute_values::Model::to_record).collect();
                insert_values(&txn, rebind_product_values(&records, &product_map, &templates)).await?
            }
            None => {
                debug!("Product {} copied under its own template, values stay", product_id);
                0
            }
        };

        txn.commit().await?;

        info!("Duplicated product {} as {} ({} values)", product_id, product.id, values_copied);
        Ok(ProductCopy { product, values_copied })
    }
}
