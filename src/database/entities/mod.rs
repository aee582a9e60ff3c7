pub mod attribute_selection_options;
pub mod attribute_set_attributes;
pub mod attribute_sets;
pub mod attribute_values;
pub mod attributes;
pub mod field_templates;
pub mod product_templates;
pub mod products;
pub mod template_attribute_sets;
