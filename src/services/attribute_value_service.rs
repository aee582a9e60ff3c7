use std::collections::{BTreeMap, HashMap, HashSet};

use sea_orm::*;
use tracing::{info, warn};

use crate::attributes::view_state::{self, FieldState};
use crate::attributes::{AttributeRef, AttributeValue, FormatPolicy, SelectionChoice, TypedValue, ValueColumns};
use crate::database::entities::{
    attribute_selection_options, attribute_set_attributes, attribute_sets, attribute_values, attributes,
    template_attribute_sets,
};
use crate::errors::{AttributeError, AttributeResult};

use super::attribute_service::find_attribute;
use super::catalog_service::{find_product, find_template, template_set_id};

/// Record a value is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOwner {
    Template(i32),
    Product(i32),
}

/// Filter on the attribute set of a value, resolved through its template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSetFilter {
    Equals(i32),
    In(Vec<i32>),
    /// Templates without an attribute set
    Unset,
}

pub(crate) async fn template_rows<C: ConnectionTrait>(
    conn: &C,
    template_id: i32,
) -> AttributeResult<Vec<attribute_values::Model>> {
    Ok(attribute_values::Entity::find()
        .filter(attribute_values::Column::TemplateId.eq(template_id))
        .filter(attribute_values::Column::ProductId.is_null())
        .order_by_asc(attribute_values::Column::Id)
        .all(conn)
        .await?)
}

pub(crate) async fn product_rows<C: ConnectionTrait>(
    conn: &C,
    product_id: i32,
) -> AttributeResult<Vec<attribute_values::Model>> {
    Ok(attribute_values::Entity::find()
        .filter(attribute_values::Column::ProductId.eq(product_id))
        .order_by_asc(attribute_values::Column::Id)
        .all(conn)
        .await?)
}

/// Resolve stored rows into typed values: attribute, option names and the
/// owning template's attribute set are looked up in bulk
pub(crate) async fn resolve_rows<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<attribute_values::Model>,
) -> AttributeResult<Vec<TypedValue>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let attribute_ids: HashSet<i32> = rows.iter().map(|r| r.attribute_id).collect();
    let attribute_refs: HashMap<i32, AttributeRef> = attributes::Entity::find()
        .filter(attributes::Column::Id.is_in(attribute_ids))
        .all(conn)
        .await?
        .iter()
        .map(|a| a.to_ref().map(|r| (a.id, r)))
        .collect::<AttributeResult<_>>()?;

    let option_ids: HashSet<i32> = rows.iter().filter_map(|r| r.value_selection).collect();
    let option_names: HashMap<i32, String> = if option_ids.is_empty() {
        HashMap::new()
    } else {
        attribute_selection_options::Entity::find()
            .filter(attribute_selection_options::Column::Id.is_in(option_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|o| (o.id, o.name))
            .collect()
    };

    let template_ids: HashSet<i32> = rows.iter().map(|r| r.template_id).collect();
    let template_sets: HashMap<i32, i32> = template_attribute_sets::Entity::find()
        .filter(template_attribute_sets::Column::TemplateId.is_in(template_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.template_id, t.attribute_set_id))
        .collect();

    rows.into_iter()
        .map(|row| {
            let attribute = attribute_refs.get(&row.attribute_id).cloned();
            let value = match &attribute {
                Some(attribute) => {
                    let option_name = row
                        .value_selection
                        .and_then(|id| option_names.get(&id))
                        .map(String::as_str);
                    row.columns().decode(attribute.attribute_type, option_name)?
                }
                None => None,
            };
            Ok(TypedValue {
                id: Some(row.id),
                template_id: row.template_id,
                product_id: row.product_id,
                attribute,
                attribute_set_id: template_sets.get(&row.template_id).copied(),
                value,
            })
        })
        .collect()
}

/// The attribute must belong to the template's attribute set; returns that set's id
pub(crate) async fn check_membership<C: ConnectionTrait>(
    conn: &C,
    template_id: i32,
    attribute: &attributes::Model,
) -> AttributeResult<i32> {
    let Some(set_id) = template_set_id(conn, template_id).await? else {
        warn!("Template {} has no attribute set, refusing '{}'", template_id, attribute.name);
        return Err(AttributeError::NotInAttributeSet {
            attribute: attribute.name.clone(),
            attribute_set: None,
        });
    };

    let linked = attribute_set_attributes::Entity::find()
        .filter(attribute_set_attributes::Column::AttributeSetId.eq(set_id))
        .filter(attribute_set_attributes::Column::AttributeId.eq(attribute.id))
        .one(conn)
        .await?
        .is_some();
    if !linked {
        let set_name = attribute_sets::Entity::find_by_id(set_id)
            .one(conn)
            .await?
            .map(|s| s.name);
        warn!("Attribute '{}' is not part of attribute set {}", attribute.name, set_id);
        return Err(AttributeError::NotInAttributeSet {
            attribute: attribute.name.clone(),
            attribute_set: set_name,
        });
    }
    Ok(set_id)
}

/// Type check `value` against the attribute and resolve selection option names
async fn check_value<C: ConnectionTrait>(
    conn: &C,
    attribute: &attributes::Model,
    value: Option<AttributeValue>,
) -> AttributeResult<Option<AttributeValue>> {
    let expected = attribute.kind()?;
    let Some(value) = value else {
        return Ok(None);
    };

    let found = value.attribute_type();
    if found != expected {
        return Err(AttributeError::TypeMismatch {
            attribute: attribute.name.clone(),
            expected,
            found,
        });
    }

    match value {
        AttributeValue::Selection(choice) => {
            let option = attribute_selection_options::Entity::find_by_id(choice.id)
                .one(conn)
                .await?
                .ok_or(AttributeError::SelectionOptionNotFound(choice.id))?;
            if option.attribute_id != attribute.id {
                return Err(AttributeError::ForeignOption {
                    option: option.id,
                    attribute: attribute.name.clone(),
                });
            }
            Ok(Some(AttributeValue::Selection(SelectionChoice {
                id: option.id,
                name: option.name,
            })))
        }
        other => Ok(Some(other)),
    }
}

/// Typed values attached to templates and products
#[derive(Clone)]
pub struct AttributeValueService {
    db: DatabaseConnection,
    policy: FormatPolicy,
}

impl AttributeValueService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            policy: FormatPolicy::default(),
        }
    }

    pub fn with_policy(db: DatabaseConnection, policy: FormatPolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> &FormatPolicy {
        &self.policy
    }

    /// Attach `attribute_id` to a template or product.
    ///
    /// A product owner attaches under the product's template. Without a value
    /// the attribute type's default is stored; types without a default need one.
    pub async fn attach(
        &self,
        owner: ValueOwner,
        attribute_id: i32,
        value: Option<AttributeValue>,
    ) -> AttributeResult<TypedValue> {
        let txn = self.db.begin().await?;

        let (template_id, product_id) = match owner {
            ValueOwner::Template(template_id) => (find_template(&txn, template_id).await?.id, None),
            ValueOwner::Product(product_id) => {
                let product = find_product(&txn, product_id).await?;
                (product.template_id, Some(product.id))
            }
        };

        let attribute = find_attribute(&txn, attribute_id).await?;
        check_membership(&txn, template_id, &attribute).await?;

        let existing = attribute_values::Entity::find()
            .filter(attribute_values::Column::TemplateId.eq(template_id))
            .filter(match product_id {
                Some(product_id) => attribute_values::Column::ProductId.eq(product_id),
                None => attribute_values::Column::ProductId.is_null(),
            })
            .filter(attribute_values::Column::AttributeId.eq(attribute_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            warn!("Attribute '{}' already attached to {:?}", attribute.name, owner);
            return Err(AttributeError::AlreadyAttached {
                attribute: attribute.name,
            });
        }

        let value = match check_value(&txn, &attribute, value).await? {
            Some(value) => value,
            None => AttributeValue::default_for(attribute.kind()?).ok_or_else(|| {
                AttributeError::Validation(format!("Attribute '{}' requires a value", attribute.name))
            })?,
        };

        let mut active = attribute_values::ActiveModel {
            template_id: Set(template_id),
            product_id: Set(product_id),
            attribute_id: Set(attribute_id),
            ..Default::default()
        };
        active.set_columns(ValueColumns::from_value(Some(&value)));
        let stored = active.insert(&txn).await?;

        txn.commit().await?;

        info!("Attached attribute '{}' to {:?} as value {}", attribute.name, owner, stored.id);
        self.resolve_one(stored).await
    }

    /// Replace the value of an attached attribute. Set membership and type are
    /// checked again; the live column is required, so clearing it is refused.
    pub async fn set_value(&self, value_id: i32, value: Option<AttributeValue>) -> AttributeResult<TypedValue> {
        let txn = self.db.begin().await?;

        let row = attribute_values::Entity::find_by_id(value_id)
            .one(&txn)
            .await?
            .ok_or(AttributeError::ValueNotFound(value_id))?;
        if let Some(product_id) = row.product_id {
            let product = find_product(&txn, product_id).await?;
            if product.template_id != row.template_id {
                return Err(AttributeError::ProductTemplateMismatch {
                    product: product_id,
                    template: row.template_id,
                });
            }
        }
        let attribute = find_attribute(&txn, row.attribute_id).await?;
        check_membership(&txn, row.template_id, &attribute).await?;
        let value = check_value(&txn, &attribute, value).await?.ok_or_else(|| {
            warn!("Refusing to clear value {} of attribute '{}'", value_id, attribute.name);
            AttributeError::Validation(format!("Attribute '{}' requires a value", attribute.name))
        })?;

        let mut active: attribute_values::ActiveModel = row.into();
        active.set_columns(ValueColumns::from_value(Some(&value)));
        let stored = active.update(&txn).await?;

        txn.commit().await?;

        info!("Updated value {} of attribute '{}'", value_id, attribute.name);
        self.resolve_one(stored).await
    }

    pub async fn get(&self, value_id: i32) -> AttributeResult<TypedValue> {
        let row = attribute_values::Entity::find_by_id(value_id)
            .one(&self.db)
            .await?
            .ok_or(AttributeError::ValueNotFound(value_id))?;
        self.resolve_one(row).await
    }

    pub async fn remove(&self, value_id: i32) -> AttributeResult<()> {
        let result = attribute_values::Entity::delete_by_id(value_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AttributeError::ValueNotFound(value_id));
        }
        info!("Removed attribute value {}", value_id);
        Ok(())
    }

    /// Values attached to the template itself
    pub async fn template_values(&self, template_id: i32) -> AttributeResult<Vec<TypedValue>> {
        find_template(&self.db, template_id).await?;
        resolve_rows(&self.db, template_rows(&self.db, template_id).await?).await
    }

    pub async fn product_values(&self, product_id: i32) -> AttributeResult<Vec<TypedValue>> {
        find_product(&self.db, product_id).await?;
        resolve_rows(&self.db, product_rows(&self.db, product_id).await?).await
    }

    /// Template-level and product-level values under one template
    pub async fn all_values(&self, template_id: i32) -> AttributeResult<Vec<TypedValue>> {
        find_template(&self.db, template_id).await?;
        let rows = attribute_values::Entity::find()
            .filter(attribute_values::Column::TemplateId.eq(template_id))
            .order_by_asc(attribute_values::Column::Id)
            .all(&self.db)
            .await?;
        resolve_rows(&self.db, rows).await
    }

    /// Search values by their attribute set, which lives on the owning template
    pub async fn search_by_attribute_set(&self, filter: &AttributeSetFilter) -> AttributeResult<Vec<TypedValue>> {
        let assigned = template_attribute_sets::Entity::find();
        let assigned = match filter {
            AttributeSetFilter::Equals(set_id) => {
                assigned.filter(template_attribute_sets::Column::AttributeSetId.eq(*set_id))
            }
            AttributeSetFilter::In(set_ids) => {
                assigned.filter(template_attribute_sets::Column::AttributeSetId.is_in(set_ids.clone()))
            }
            AttributeSetFilter::Unset => assigned,
        };
        let template_ids: Vec<i32> = assigned
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| t.template_id)
            .collect();

        let template_filter = match filter {
            AttributeSetFilter::Unset => attribute_values::Column::TemplateId.is_not_in(template_ids),
            _ => attribute_values::Column::TemplateId.is_in(template_ids),
        };
        let rows = attribute_values::Entity::find()
            .filter(template_filter)
            .order_by_asc(attribute_values::Column::Id)
            .all(&self.db)
            .await?;
        resolve_rows(&self.db, rows).await
    }

    pub async fn display_value(&self, value_id: i32) -> AttributeResult<Option<String>> {
        Ok(self.get(value_id).await?.display_value(&self.policy))
    }

    /// Required/invisible state of each value column for the row
    pub async fn field_states(&self, value_id: i32) -> AttributeResult<BTreeMap<&'static str, FieldState>> {
        let value = self.get(value_id).await?;
        Ok(view_state::value_column_states(value.attribute_type()))
    }

    async fn resolve_one(&self, row: attribute_values::Model) -> AttributeResult<TypedValue> {
        let id = row.id;
        resolve_rows(&self.db, vec![row])
            .await?
            .pop()
            .ok_or(AttributeError::ValueNotFound(id))
    }
}
