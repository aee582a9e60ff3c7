use chrono::Utc;
use sea_orm::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::attributes::fill::{self, FillOutcome};
use crate::attributes::view_state::{self, FieldState};
use crate::attributes::{ElevatedRead, TypedValue};
use crate::database::entities::{
    attribute_sets, attribute_values, product_templates, products, template_attribute_sets,
};
use crate::errors::{AttributeError, AttributeResult};

use super::attribute_set_service::load_snapshot;
use super::attribute_value_service::{product_rows, resolve_rows, template_rows};
use super::validation::validate_name;

pub(crate) async fn find_template<C: ConnectionTrait>(
    conn: &C,
    template_id: i32,
) -> AttributeResult<product_templates::Model> {
    product_templates::Entity::find_by_id(template_id)
        .one(conn)
        .await?
        .ok_or(AttributeError::TemplateNotFound(template_id))
}

pub(crate) async fn find_product<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
) -> AttributeResult<products::Model> {
    products::Entity::find_by_id(product_id)
        .one(conn)
        .await?
        .ok_or(AttributeError::ProductNotFound(product_id))
}

/// Attribute set assigned to the template, if any
pub(crate) async fn template_set_id<C: ConnectionTrait>(
    conn: &C,
    template_id: i32,
) -> AttributeResult<Option<i32>> {
    Ok(template_attribute_sets::Entity::find_by_id(template_id)
        .one(conn)
        .await?
        .map(|row| row.attribute_set_id))
}

pub(crate) async fn template_products<C: ConnectionTrait>(
    conn: &C,
    template_id: i32,
) -> AttributeResult<Vec<products::Model>> {
    Ok(products::Entity::find()
        .filter(products::Column::TemplateId.eq(template_id))
        .order_by_asc(products::Column::Id)
        .all(conn)
        .await?)
}

/// Result of changing a template's attribute set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetAssignment {
    pub template_id: i32,
    pub previous: Option<i32>,
    pub attribute_set_id: Option<i32>,
    /// Recomputed template-level values when the new set fills on selection
    pub fill: Option<FillOutcome>,
}

impl SetAssignment {
    pub fn changed(&self) -> bool {
        self.previous != self.attribute_set_id
    }
}

/// Form state of a template or product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogFormState {
    pub attribute_set_id: Option<i32>,
    pub use_templates: bool,
    pub attribute_values: FieldState,
    pub update_action: FieldState,
}

impl CatalogFormState {
    fn new(attribute_set_id: Option<i32>, use_templates: bool) -> Self {
        Self {
            attribute_set_id,
            use_templates,
            attribute_values: view_state::attribute_values_state(attribute_set_id),
            update_action: view_state::update_action_state(use_templates),
        }
    }
}

/// Product templates, their variants and the attribute set extension
#[derive(Clone)]
pub struct CatalogService {
    db: DatabaseConnection,
}

impl CatalogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_template(&self, name: &str) -> AttributeResult<product_templates::Model> {
        let name = validate_name("Template", name)?;
        let now = Utc::now();
        let template = product_templates::ActiveModel {
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created template {} ({})", template.name, template.id);
        Ok(template)
    }

    pub async fn get_template(&self, template_id: i32) -> AttributeResult<product_templates::Model> {
        find_template(&self.db, template_id).await
    }

    pub async fn list_templates(&self) -> AttributeResult<Vec<product_templates::Model>> {
        Ok(product_templates::Entity::find()
            .order_by_asc(product_templates::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn create_product(&self, template_id: i32, code: Option<String>) -> AttributeResult<products::Model> {
        find_template(&self.db, template_id).await?;
        let now = Utc::now();
        let product = products::ActiveModel {
            template_id: Set(template_id),
            code: Set(code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created product {} for template {}", product.id, template_id);
        Ok(product)
    }

    pub async fn get_product(&self, product_id: i32) -> AttributeResult<products::Model> {
        find_product(&self.db, product_id).await
    }

    pub async fn products_of_template(&self, template_id: i32) -> AttributeResult<Vec<products::Model>> {
        find_template(&self.db, template_id).await?;
        template_products(&self.db, template_id).await
    }

    pub async fn template_attribute_set(&self, template_id: i32) -> AttributeResult<Option<attribute_sets::Model>> {
        find_template(&self.db, template_id).await?;
        match template_set_id(&self.db, template_id).await? {
            Some(set_id) => Ok(attribute_sets::Entity::find_by_id(set_id).one(&self.db).await?),
            None => Ok(None),
        }
    }

    /// Derived through the product's template, never stored on the product
    pub async fn product_attribute_set(&self, product_id: i32) -> AttributeResult<Option<attribute_sets::Model>> {
        let product = find_product(&self.db, product_id).await?;
        self.template_attribute_set(product.template_id).await
    }

    pub async fn use_templates(&self, template_id: i32) -> AttributeResult<bool> {
        Ok(self
            .template_attribute_set(template_id)
            .await?
            .map(|set| set.use_templates)
            .unwrap_or(false))
    }

    /// Assign (or clear) the template's attribute set.
    ///
    /// When the reference changes to a set with `fill_on_selection`, the
    /// template-level values are resynchronised with the set: values of
    /// attributes outside the set are deleted and missing attributes get a
    /// default value. Product-level values are never touched.
    pub async fn assign_attribute_set(
        &self,
        template_id: i32,
        attribute_set_id: Option<i32>,
    ) -> AttributeResult<SetAssignment> {
        let txn = self.db.begin().await?;

        find_template(&txn, template_id).await?;
        let previous = template_set_id(&txn, template_id).await?;

        let mut assignment = SetAssignment {
            template_id,
            previous,
            attribute_set_id,
            fill: None,
        };
        if !assignment.changed() {
            debug!("Template {} already uses attribute set {:?}", template_id, attribute_set_id);
            txn.commit().await?;
            return Ok(assignment);
        }

        template_attribute_sets::Entity::delete_by_id(template_id)
            .exec(&txn)
            .await?;

        if let Some(set_id) = attribute_set_id {
            let snapshot = load_snapshot(&txn, set_id).await?;
            template_attribute_sets::ActiveModel {
                template_id: Set(template_id),
                attribute_set_id: Set(set_id),
            }
            .insert(&txn)
            .await?;

            let current = resolve_rows(&txn, template_rows(&txn, template_id).await?).await?;
            if let Some(mut outcome) = fill::fill_on_selection(template_id, current, &snapshot) {
                debug!(
                    "Fill on selection for template {}: {} kept, {} added, {} dropped",
                    template_id,
                    outcome.kept.len(),
                    outcome.added.len(),
                    outcome.dropped.len()
                );

                let dropped: Vec<i32> = outcome.dropped.iter().filter_map(|v| v.id).collect();
                if !dropped.is_empty() {
                    attribute_values::Entity::delete_many()
                        .filter(attribute_values::Column::Id.is_in(dropped))
                        .exec(&txn)
                        .await?;
                }

                for row in outcome.added.iter_mut() {
                    let attribute_id = row
                        .attribute_id()
                        .ok_or_else(|| AttributeError::Validation("Filled value has no attribute".to_string()))?;
                    let mut active = attribute_values::ActiveModel {
                        template_id: Set(template_id),
                        product_id: Set(None),
                        attribute_id: Set(attribute_id),
                        ..Default::default()
                    };
                    active.set_columns(row.columns());
                    let stored = active.insert(&txn).await?;
                    row.id = Some(stored.id);
                }

                assignment.fill = Some(outcome);
            }
        }

        txn.commit().await?;

        info!(
            "Template {} attribute set changed from {:?} to {:?}",
            template_id, previous, attribute_set_id
        );
        Ok(assignment)
    }

    /// What [`assign_attribute_set`](Self::assign_attribute_set) would do to the
    /// template-level values, without persisting anything
    pub async fn preview_attribute_set_change(
        &self,
        template_id: i32,
        attribute_set_id: Option<i32>,
    ) -> AttributeResult<Option<FillOutcome>> {
        find_template(&self.db, template_id).await?;
        let Some(set_id) = attribute_set_id else {
            return Ok(None);
        };
        let snapshot = load_snapshot(&self.db, set_id).await?;
        let current = resolve_rows(&self.db, template_rows(&self.db, template_id).await?).await?;
        Ok(fill::fill_on_selection(template_id, current, &snapshot))
    }

    /// Every value a template carries, read past record rules
    pub async fn template_attribute_usage(
        &self,
        template_id: i32,
        elevated: &ElevatedRead,
    ) -> AttributeResult<Vec<TypedValue>> {
        find_template(&self.db, template_id).await?;
        debug!(
            "Reading attribute usage of template {} on behalf of {:?}",
            template_id,
            elevated.on_behalf_of()
        );
        resolve_rows(&self.db, template_rows(&self.db, template_id).await?).await
    }

    /// The product's own values followed by its template's values
    pub async fn product_attribute_usage(
        &self,
        product_id: i32,
        elevated: &ElevatedRead,
    ) -> AttributeResult<Vec<TypedValue>> {
        let product = find_product(&self.db, product_id).await?;
        let mut usage = resolve_rows(&self.db, product_rows(&self.db, product_id).await?).await?;
        usage.extend(self.template_attribute_usage(product.template_id, elevated).await?);
        Ok(usage)
    }

    pub async fn template_form_state(&self, template_id: i32) -> AttributeResult<CatalogFormState> {
        let set = self.template_attribute_set(template_id).await?;
        Ok(CatalogFormState::new(
            set.as_ref().map(|s| s.id),
            set.map(|s| s.use_templates).unwrap_or(false),
        ))
    }

    pub async fn product_form_state(&self, product_id: i32) -> AttributeResult<CatalogFormState> {
        let product = find_product(&self.db, product_id).await?;
        self.template_form_state(product.template_id).await
    }
}
