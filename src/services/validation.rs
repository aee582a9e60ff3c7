use crate::errors::{AttributeError, AttributeResult};

/// Names the render context binds besides the attributes themselves
pub const RESERVED_ATTRIBUTE_NAMES: [&str; 2] = ["record", "user"];

/// Any non-blank name is accepted. Names that are not plain identifiers are
/// reached from expressions with segment literals, e.g. `{{[Shoe size]}}`.
pub fn validate_attribute_name(name: &str) -> AttributeResult<String> {
    let name = validate_name("Attribute", name)?;
    if RESERVED_ATTRIBUTE_NAMES.contains(&name.as_str()) {
        return Err(AttributeError::Validation(format!(
            "Attribute name '{}' is reserved",
            name
        )));
    }
    Ok(name)
}

/// Names of sets, templates and selection options
pub fn validate_name(kind: &str, name: &str) -> AttributeResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AttributeError::Validation(format!("{} name cannot be empty", kind)));
    }
    Ok(name.to_string())
}

/// Blank display names are stored as unset
pub fn normalize_display_name(display_name: Option<String>) -> Option<String> {
    display_name
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names() {
        assert_eq!(validate_attribute_name(" Color ").unwrap(), "Color");
        assert_eq!(validate_attribute_name("Größe").unwrap(), "Größe");
        assert_eq!(validate_attribute_name("Shoe size").unwrap(), "Shoe size");
        assert!(validate_attribute_name("2nd").is_ok());
        assert!(validate_attribute_name("  ").is_err());
        assert!(validate_attribute_name("record").is_err());
        assert!(validate_attribute_name("user").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(validate_name("Attribute set", " Apparel ").unwrap(), "Apparel");
        assert!(matches!(
            validate_name("Attribute set", "  "),
            Err(AttributeError::Validation(_))
        ));
    }

    #[test]
    fn test_display_name_normalized() {
        assert_eq!(normalize_display_name(Some("  ".to_string())), None);
        assert_eq!(normalize_display_name(Some(" Hue ".to_string())), Some("Hue".to_string()));
        assert_eq!(normalize_display_name(None), None);
    }
}
