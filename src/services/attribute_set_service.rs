use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::*;
use tracing::{debug, info, warn};

use crate::attributes::view_state::{self, FieldState};
use crate::attributes::{AttributeSetSnapshot, FieldTarget};
use crate::database::entities::{
    attribute_set_attributes, attribute_sets, attributes, field_templates, template_attribute_sets,
};
use crate::errors::{AttributeError, AttributeResult};
use crate::rendering::ExpressionRenderer;

use super::attribute_service::find_attribute;
use super::validation::validate_name;

pub const DEFAULT_FIELD_TEMPLATE_SEQUENCE: i32 = 10;

pub(crate) async fn find_set<C: ConnectionTrait>(conn: &C, set_id: i32) -> AttributeResult<attribute_sets::Model> {
    attribute_sets::Entity::find_by_id(set_id)
        .one(conn)
        .await?
        .ok_or(AttributeError::AttributeSetNotFound(set_id))
}

/// Attributes of a set in the order they were linked
pub(crate) async fn set_attributes<C: ConnectionTrait>(
    conn: &C,
    set_id: i32,
) -> AttributeResult<Vec<attributes::Model>> {
    let links = attribute_set_attributes::Entity::find()
        .filter(attribute_set_attributes::Column::AttributeSetId.eq(set_id))
        .order_by_asc(attribute_set_attributes::Column::Id)
        .all(conn)
        .await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<i32, attributes::Model> = attributes::Entity::find()
        .filter(attributes::Column::Id.is_in(links.iter().map(|l| l.attribute_id)))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(links
        .iter()
        .filter_map(|link| by_id.remove(&link.attribute_id))
        .collect())
}

pub(crate) async fn load_snapshot<C: ConnectionTrait>(
    conn: &C,
    set_id: i32,
) -> AttributeResult<AttributeSetSnapshot> {
    let set = find_set(conn, set_id).await?;
    let attributes = set_attributes(conn, set_id)
        .await?
        .iter()
        .map(attributes::Model::to_ref)
        .collect::<AttributeResult<Vec<_>>>()?;

    Ok(AttributeSetSnapshot {
        id: set.id,
        name: set.name,
        use_templates: set.use_templates,
        fill_on_selection: set.fill_on_selection,
        attributes,
    })
}

pub(crate) async fn set_field_templates<C: ConnectionTrait>(
    conn: &C,
    set_id: i32,
) -> AttributeResult<Vec<field_templates::Model>> {
    Ok(field_templates::Entity::find()
        .filter(field_templates::Column::AttributeSetId.eq(set_id))
        .order_by_asc(field_templates::Column::Sequence)
        .order_by_asc(field_templates::Column::Id)
        .all(conn)
        .await?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttributeSet {
    pub name: String,
    pub use_templates: bool,
    pub fill_on_selection: bool,
}

impl NewAttributeSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            use_templates: false,
            fill_on_selection: false,
        }
    }

    pub fn use_templates(mut self, enabled: bool) -> Self {
        self.use_templates = enabled;
        self
    }

    pub fn fill_on_selection(mut self, enabled: bool) -> Self {
        self.fill_on_selection = enabled;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSetUpdate {
    pub name: Option<String>,
    pub use_templates: Option<bool>,
    pub fill_on_selection: Option<bool>,
}

/// Attribute sets, their attribute links and field templates
#[derive(Clone)]
pub struct AttributeSetService {
    db: DatabaseConnection,
    renderer: Arc<ExpressionRenderer>,
}

impl AttributeSetService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            renderer: Arc::new(ExpressionRenderer::new()),
        }
    }

    pub async fn create(&self, new: NewAttributeSet) -> AttributeResult<attribute_sets::Model> {
        let set = attribute_sets::ActiveModel {
            name: Set(validate_name("Attribute set", &new.name)?),
            use_templates: Set(new.use_templates),
            fill_on_selection: Set(new.fill_on_selection),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created attribute set {} ({})", set.name, set.id);
        Ok(set)
    }

    pub async fn get(&self, set_id: i32) -> AttributeResult<attribute_sets::Model> {
        find_set(&self.db, set_id).await
    }

    pub async fn list(&self) -> AttributeResult<Vec<attribute_sets::Model>> {
        Ok(attribute_sets::Entity::find()
            .order_by_asc(attribute_sets::Column::Name)
            .order_by_asc(attribute_sets::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn update(&self, set_id: i32, update: AttributeSetUpdate) -> AttributeResult<attribute_sets::Model> {
        let mut active: attribute_sets::ActiveModel = find_set(&self.db, set_id).await?.into();
        if let Some(name) = update.name {
            active.name = Set(validate_name("Attribute set", &name)?);
        }
        if let Some(use_templates) = update.use_templates {
            active.use_templates = Set(use_templates);
        }
        if let Some(fill_on_selection) = update.fill_on_selection {
            active.fill_on_selection = Set(fill_on_selection);
        }
        let set = active.update(&self.db).await?;

        info!("Updated attribute set {} ({})", set.name, set.id);
        Ok(set)
    }

    /// Links and field templates go with the set; refused while a template uses it
    pub async fn delete(&self, set_id: i32) -> AttributeResult<()> {
        let txn = self.db.begin().await?;
        let set = find_set(&txn, set_id).await?;

        let assigned = template_attribute_sets::Entity::find()
            .filter(template_attribute_sets::Column::AttributeSetId.eq(set_id))
            .count(&txn)
            .await?;
        if assigned > 0 {
            warn!("Refusing to delete attribute set {}: assigned to {} templates", set.name, assigned);
            return Err(AttributeError::InUse(format!("Attribute set '{}'", set.name)));
        }

        attribute_sets::Entity::delete_by_id(set_id).exec(&txn).await?;
        txn.commit().await?;

        info!("Deleted attribute set {} ({})", set.name, set_id);
        Ok(())
    }

    /// Returns `false` when the attribute was already in the set
    pub async fn add_attribute(&self, set_id: i32, attribute_id: i32) -> AttributeResult<bool> {
        let set = find_set(&self.db, set_id).await?;
        let attribute = find_attribute(&self.db, attribute_id).await?;

        let existing = attribute_set_attributes::Entity::find()
            .filter(attribute_set_attributes::Column::AttributeSetId.eq(set_id))
            .filter(attribute_set_attributes::Column::AttributeId.eq(attribute_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            debug!("Attribute {} already in set {}", attribute.name, set.name);
            return Ok(false);
        }

        attribute_set_attributes::ActiveModel {
            attribute_id: Set(attribute_id),
            attribute_set_id: Set(set_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Added attribute {} to set {}", attribute.name, set.name);
        Ok(true)
    }

    /// Returns `false` when the attribute was not in the set
    pub async fn remove_attribute(&self, set_id: i32, attribute_id: i32) -> AttributeResult<bool> {
        let result = attribute_set_attributes::Entity::delete_many()
            .filter(attribute_set_attributes::Column::AttributeSetId.eq(set_id))
            .filter(attribute_set_attributes::Column::AttributeId.eq(attribute_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            info!("Removed attribute {} from set {}", attribute_id, set_id);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn attributes(&self, set_id: i32) -> AttributeResult<Vec<attributes::Model>> {
        find_set(&self.db, set_id).await?;
        set_attributes(&self.db, set_id).await
    }

    pub async fn snapshot(&self, set_id: i32) -> AttributeResult<AttributeSetSnapshot> {
        load_snapshot(&self.db, set_id).await
    }

    /// `target_field` must be one of the known `object,field` references. The
    /// expression is parsed up front when a template engine is available.
    pub async fn add_field_template(
        &self,
        set_id: i32,
        target_field: &str,
        template_text: &str,
        sequence: Option<i32>,
    ) -> AttributeResult<field_templates::Model> {
        let set = find_set(&self.db, set_id).await?;
        let target: FieldTarget = target_field.parse()?;
        if self.renderer.is_available() {
            self.renderer.check(template_text)?;
        }

        let field_template = field_templates::ActiveModel {
            attribute_set_id: Set(set_id),
            target_field: Set(target.as_str().to_string()),
            template_text: Set(template_text.to_string()),
            sequence: Set(sequence.unwrap_or(DEFAULT_FIELD_TEMPLATE_SEQUENCE)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Added field template for {} to set {}", target, set.name);
        Ok(field_template)
    }

    /// Ordered by sequence, then creation
    pub async fn list_field_templates(&self, set_id: i32) -> AttributeResult<Vec<field_templates::Model>> {
        find_set(&self.db, set_id).await?;
        set_field_templates(&self.db, set_id).await
    }

    pub async fn field_templates_state(&self, set_id: i32) -> AttributeResult<FieldState> {
        Ok(view_state::field_templates_state(find_set(&self.db, set_id).await?.use_templates))
    }

    pub async fn remove_field_template(&self, field_template_id: i32) -> AttributeResult<()> {
        let result = field_templates::Entity::delete_by_id(field_template_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AttributeError::FieldTemplateNotFound(field_template_id));
        }
        info!("Removed field template {}", field_template_id);
        Ok(())
    }
}
