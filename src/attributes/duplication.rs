//! Rebinding attribute values onto duplicated templates and products

use std::collections::HashMap;

use super::value::ValueColumns;

/// Old id → new id for one kind of duplicated record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap(HashMap<i32, i32>);

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: i32, new: i32) {
        self.0.insert(old, new);
    }

    pub fn get(&self, old: i32) -> Option<i32> {
        self.0.get(&old).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Stored attribute value reduced to what a copy carries over
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRecord {
    pub template_id: i32,
    pub product_id: Option<i32>,
    pub attribute_id: i32,
    pub columns: ValueColumns,
}

/// Template-level rows whose template was duplicated, bound to the new template.
/// Product-level rows are never copied here.
pub fn rebind_template_values(rows: &[ValueRecord], templates: &IdMap) -> Vec<ValueRecord> {
    rows.iter()
        .filter(|row| row.product_id.is_none())
        .filter_map(|row| {
            templates.get(row.template_id).map(|new_template| ValueRecord {
                template_id: new_template,
                product_id: None,
                attribute_id: row.attribute_id,
                columns: row.columns.clone(),
            })
        })
        .collect()
}

/// Product-level rows whose product and template were both duplicated, bound to both new ids.
/// A product copied under its original template has no entry in `templates` and keeps no rows.
pub fn rebind_product_values(rows: &[ValueRecord], products: &IdMap, templates: &IdMap) -> Vec<ValueRecord> {
    rows.iter()
        .filter_map(|row| {
            let product = row.product_id?;
            let new_product = products.get(product)?;
            let new_template = templates.get(row.template_id)?;
            Some(ValueRecord {
                template_id: new_template,
                product_id: Some(new_product),
                attribute_id: row.attribute_id,
                columns: row.columns.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(template_id: i32, product_id: Option<i32>, attribute_id: i32, text: &str) -> ValueRecord {
        ValueRecord {
            template_id,
            product_id,
            attribute_id,
            columns: ValueColumns {
                value_char: Some(text.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_template_rows_follow_template_map() {
        let rows = vec![
            record(1, None, 10, "a"),
            record(1, None, 11, "b"),
            record(1, Some(5), 12, "variant"),
        ];
        let mut templates = IdMap::new();
        templates.insert(1, 2);

        let copies = rebind_template_values(&rows, &templates);
        assert_eq!(copies.len(), 2);
        assert!(copies.iter().all(|c| c.template_id == 2 && c.product_id.is_none()));
        assert_eq!(copies[1].columns.value_char.as_deref(), Some("b"));
    }

    #[test]
    fn test_product_rows_need_both_maps() {
        let rows = vec![record(1, Some(5), 12, "variant"), record(1, None, 10, "a")];
        let mut products = IdMap::new();
        products.insert(5, 6);

        assert!(rebind_product_values(&rows, &products, &IdMap::new()).is_empty());

        let mut templates = IdMap::new();
        templates.insert(1, 2);
        let copies = rebind_product_values(&rows, &products, &templates);
        assert_eq!(copies, vec![record(2, Some(6), 12, "variant")]);
    }
}
