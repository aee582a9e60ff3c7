use sea_orm::*;
use tracing::{info, warn};

use crate::attributes::view_state::{self, FieldState};
use crate::attributes::AttributeType;
use crate::database::entities::{attribute_selection_options, attribute_sets, attribute_values, attributes};
use crate::errors::{AttributeError, AttributeResult};

use super::validation::{normalize_display_name, validate_attribute_name, validate_name};

pub(crate) async fn find_attribute<C: ConnectionTrait>(
    conn: &C,
    attribute_id: i32,
) -> AttributeResult<attributes::Model> {
    attributes::Entity::find_by_id(attribute_id)
        .one(conn)
        .await?
        .ok_or(AttributeError::AttributeNotFound(attribute_id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttribute {
    pub name: String,
    pub display_name: Option<String>,
    pub attribute_type: AttributeType,
}

impl NewAttribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            attribute_type,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Fields left as `None` keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub name: Option<String>,
    pub display_name: Option<Option<String>>,
    pub attribute_type: Option<AttributeType>,
}

/// Attribute definitions and their selection options
#[derive(Clone)]
pub struct AttributeService {
    db: DatabaseConnection,
}

impl AttributeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewAttribute) -> AttributeResult<attributes::Model> {
        let attribute = attributes::ActiveModel {
            name: Set(validate_attribute_name(&new.name)?),
            display_name: Set(normalize_display_name(new.display_name)),
            attribute_type: Set(new.attribute_type.as_str().to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created {} attribute {} ({})", attribute.attribute_type, attribute.name, attribute.id);
        Ok(attribute)
    }

    pub async fn get(&self, attribute_id: i32) -> AttributeResult<attributes::Model> {
        find_attribute(&self.db, attribute_id).await
    }

    pub async fn list(&self) -> AttributeResult<Vec<attributes::Model>> {
        Ok(attributes::Entity::find()
            .order_by_asc(attributes::Column::Name)
            .order_by_asc(attributes::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn rec_name(&self, attribute_id: i32) -> AttributeResult<String> {
        Ok(self.get(attribute_id).await?.rec_name().to_string())
    }

    /// The type can only change while no value uses the attribute, and only
    /// to `selection` while it still has options
    pub async fn update(&self, attribute_id: i32, update: AttributeUpdate) -> AttributeResult<attributes::Model> {
        let txn = self.db.begin().await?;
        let current = find_attribute(&txn, attribute_id).await?;
        let current_type = current.kind()?;

        if let Some(new_type) = update.attribute_type.filter(|t| *t != current_type) {
            let values = attribute_values::Entity::find()
                .filter(attribute_values::Column::AttributeId.eq(attribute_id))
                .count(&txn)
                .await?;
            if values > 0 {
                warn!("Refusing type change of attribute {}: {} values", current.name, values);
                return Err(AttributeError::InUse(format!("Attribute '{}'", current.name)));
            }

            let options = attribute_selection_options::Entity::find()
                .filter(attribute_selection_options::Column::AttributeId.eq(attribute_id))
                .count(&txn)
                .await?;
            if options > 0 && new_type != AttributeType::Selection {
                warn!("Refusing type change of attribute {}: {} options", current.name, options);
                return Err(AttributeError::Validation(format!(
                    "Attribute '{}' still has {} selection options",
                    current.name, options
                )));
            }
        }

        let mut active: attributes::ActiveModel = current.into();
        if let Some(name) = update.name {
            active.name = Set(validate_attribute_name(&name)?);
        }
        if let Some(display_name) = update.display_name {
            active.display_name = Set(normalize_display_name(display_name));
        }
        if let Some(attribute_type) = update.attribute_type {
            active.attribute_type = Set(attribute_type.as_str().to_string());
        }
        let attribute = active.update(&txn).await?;

        txn.commit().await?;

        info!("Updated attribute {} ({})", attribute.name, attribute.id);
        Ok(attribute)
    }

    /// Options and set links go with the attribute; refused while values reference it
    pub async fn delete(&self, attribute_id: i32) -> AttributeResult<()> {
        let txn = self.db.begin().await?;
        let attribute = find_attribute(&txn, attribute_id).await?;

        let values = attribute_values::Entity::find()
            .filter(attribute_values::Column::AttributeId.eq(attribute_id))
            .count(&txn)
            .await?;
        if values > 0 {
            warn!("Refusing to delete attribute {}: {} values", attribute.name, values);
            return Err(AttributeError::InUse(format!("Attribute '{}'", attribute.name)));
        }

        attributes::Entity::delete_by_id(attribute_id).exec(&txn).await?;
        txn.commit().await?;

        info!("Deleted attribute {} ({})", attribute.name, attribute_id);
        Ok(())
    }

    pub async fn add_option(
        &self,
        attribute_id: i32,
        name: &str,
    ) -> AttributeResult<attribute_selection_options::Model> {
        let attribute = find_attribute(&self.db, attribute_id).await?;
        if attribute.kind()? != AttributeType::Selection {
            return Err(AttributeError::SelectionNotAllowed(attribute.name));
        }

        let option = attribute_selection_options::ActiveModel {
            attribute_id: Set(attribute_id),
            name: Set(validate_name("Selection option", name)?),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Added option {} to attribute {}", option.name, attribute.name);
        Ok(option)
    }

    pub async fn list_options(&self, attribute_id: i32) -> AttributeResult<Vec<attribute_selection_options::Model>> {
        find_attribute(&self.db, attribute_id).await?;
        Ok(attribute_selection_options::Entity::find()
            .filter(attribute_selection_options::Column::AttributeId.eq(attribute_id))
            .order_by_asc(attribute_selection_options::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Refused while a value has the option selected
    pub async fn remove_option(&self, option_id: i32) -> AttributeResult<()> {
        let option = attribute_selection_options::Entity::find_by_id(option_id)
            .one(&self.db)
            .await?
            .ok_or(AttributeError::SelectionOptionNotFound(option_id))?;

        let selected = attribute_values::Entity::find()
            .filter(attribute_values::Column::ValueSelection.eq(option_id))
            .count(&self.db)
            .await?;
        if selected > 0 {
            warn!("Refusing to remove option {}: selected by {} values", option.name, selected);
            return Err(AttributeError::InUse(format!("Selection option '{}'", option.name)));
        }

        attribute_selection_options::Entity::delete_by_id(option_id)
            .exec(&self.db)
            .await?;

        info!("Removed option {} ({})", option.name, option_id);
        Ok(())
    }

    /// Selection options are only shown on selection attributes
    pub async fn options_state(&self, attribute_id: i32) -> AttributeResult<FieldState> {
        let attribute = find_attribute(&self.db, attribute_id).await?;
        Ok(view_state::selection_options_state(attribute.kind()?))
    }

    pub async fn attribute_sets(&self, attribute_id: i32) -> AttributeResult<Vec<attribute_sets::Model>> {
        let attribute = find_attribute(&self.db, attribute_id).await?;
        Ok(attribute
            .find_related(attribute_sets::Entity)
            .order_by_asc(attribute_sets::Column::Id)
            .all(&self.db)
            .await?)
    }
}
