use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::attributes::{AccessContext, FieldTarget, FormatPolicy, TypedValue};
use crate::database::entities::{attribute_values, product_templates, products};
use crate::errors::AttributeResult;
use crate::rendering::{ExpressionRenderer, RenderContext};

use super::attribute_set_service::{find_set, set_field_templates};
use super::attribute_value_service::{resolve_rows, template_rows};
use super::catalog_service::{find_product, find_template, template_products, template_set_id};

/// Records after field templates were applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivationOutcome {
    pub template: product_templates::Model,
    /// Each product that had a field assigned, once
    pub products: Vec<products::Model>,
}

/// Renders an attribute set's field templates onto templates and products
#[derive(Clone)]
pub struct TemplateDerivationService {
    db: DatabaseConnection,
    policy: FormatPolicy,
    renderer: Arc<ExpressionRenderer>,
}

impl TemplateDerivationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_policy(db, FormatPolicy::default())
    }

    pub fn with_policy(db: DatabaseConnection, policy: FormatPolicy) -> Self {
        Self {
            db,
            policy,
            renderer: Arc::new(ExpressionRenderer::new()),
        }
    }

    fn display_map(&self, values: &[TypedValue]) -> Vec<(String, String)> {
        values
            .iter()
            .filter_map(|v| {
                let name = v.attribute_name()?.to_string();
                Some((name, v.display_value(&self.policy)?))
            })
            .collect()
    }

    /// Render every field template of the template's attribute set.
    ///
    /// `template,name` targets are rendered against the template's own values;
    /// `product,code` targets are rendered once per product, against the
    /// template's values overlaid with that product's values. Nothing happens
    /// when the template has no set or the set does not use templates.
    pub async fn update_template_values(
        &self,
        template_id: i32,
        access: &AccessContext,
    ) -> AttributeResult<DerivationOutcome> {
        let txn = self.db.begin().await?;

        let mut template = find_template(&txn, template_id).await?;
        let set = match template_set_id(&txn, template_id).await? {
            Some(set_id) => Some(find_set(&txn, set_id).await?),
            None => None,
        };
        let Some(set) = set.filter(|s| s.use_templates) else {
            debug!("Template {} does not use field templates", template_id);
            txn.commit().await?;
            return Ok(DerivationOutcome {
                template,
                products: Vec::new(),
            });
        };

        let field_templates = set_field_templates(&txn, set.id).await?;
        let targets = field_templates
            .iter()
            .map(|ft| ft.target().map(|target| (target, ft.template_text.as_str())))
            .collect::<Result<Vec<_>, _>>()?;

        let template_values = resolve_rows(&txn, template_rows(&txn, template_id).await?).await?;
        let base = self.display_map(&template_values);

        let mut products = template_products(&txn, template_id).await?;
        let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let mut product_values: HashMap<i32, Vec<(String, String)>> = HashMap::new();
        if !product_ids.is_empty() {
            let rows = attribute_values::Entity::find()
                .filter(attribute_values::Column::ProductId.is_in(product_ids))
                .order_by_asc(attribute_values::Column::Id)
                .all(&txn)
                .await?;
            for value in resolve_rows(&txn, rows).await? {
                if let Some(product_id) = value.product_id {
                    product_values
                        .entry(product_id)
                        .or_default()
                        .extend(self.display_map(std::slice::from_ref(&value)));
                }
            }
        }

        let original_name = template.name.clone();
        let original_codes: Vec<Option<String>> = products.iter().map(|p| p.code.clone()).collect();
        let mut assigned = vec![false; products.len()];

        for (target, expression) in targets {
            match target {
                FieldTarget::TemplateName => {
                    let context = RenderContext::new()
                        .with_attributes(base.clone())
                        .with_record(template.render_record())
                        .with_user(access.user());
                    template.name = self.renderer.render(target, expression, &context)?;
                }
                FieldTarget::ProductCode => {
                    for (index, product) in products.iter_mut().enumerate() {
                        let mut context = RenderContext::new()
                            .with_attributes(base.clone())
                            .with_record(product.render_record())
                            .with_user(access.user());
                        for (name, value) in product_values.get(&product.id).into_iter().flatten() {
                            context.set_attribute(name.clone(), value.clone());
                        }
                        product.code = Some(self.renderer.render(target, expression, &context)?);
                        assigned[index] = true;
                    }
                }
            }
        }

        let now = Utc::now();
        if template.name != original_name {
            let mut active: product_templates::ActiveModel = find_template(&txn, template_id).await?.into();
            active.name = Set(template.name.clone());
            active.updated_at = Set(now);
            template = active.update(&txn).await?;
        }

        let mut mutated = Vec::new();
        for ((product, original_code), assigned) in products.into_iter().zip(original_codes).zip(assigned) {
            if !assigned {
                continue;
            }
            if product.code == original_code {
                mutated.push(product);
                continue;
            }
            let mut active: products::ActiveModel = find_product(&txn, product.id).await?.into();
            active.code = Set(product.code.clone());
            active.updated_at = Set(now);
            mutated.push(active.update(&txn).await?);
        }

        txn.commit().await?;

        info!(
            "Applied {} field templates of set {} to template {} and {} products",
            field_templates.len(),
            set.name,
            template_id,
            mutated.len()
        );
        Ok(DerivationOutcome {
            template,
            products: mutated,
        })
    }

    /// Products derive their fields through their template
    pub async fn update_product_values(
        &self,
        product_id: i32,
        access: &AccessContext,
    ) -> AttributeResult<DerivationOutcome> {
        let product = find_product(&self.db, product_id).await?;
        self.update_template_values(product.template_id, access).await
    }
}
