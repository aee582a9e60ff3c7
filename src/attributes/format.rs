//! Display formatting for attribute values
//!
//! Datetimes are stored in UTC and shown in the company offset; dates use
//! the configured locale pattern.

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::AttributeType;
use super::value::AttributeValue;
use crate::errors::ConfigError;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

static UTC_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])(\d{2}):(\d{2})$").expect("valid offset pattern"));

#[derive(Debug, Clone, PartialEq)]
pub struct FormatPolicy {
    timezone: Option<FixedOffset>,
    date_format: String,
}

impl Default for FormatPolicy {
    fn default() -> Self {
        Self {
            timezone: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl FormatPolicy {
    pub fn new(timezone: Option<FixedOffset>, date_format: impl Into<String>) -> Result<Self, ConfigError> {
        let date_format = date_format.into();
        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(date_format));
        }
        Ok(Self {
            timezone,
            date_format,
        })
    }

    /// Parse a `+HH:MM` / `-HH:MM` offset
    pub fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
        let invalid = || ConfigError::InvalidTimezone(raw.to_string());
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return FixedOffset::east_opt(0).ok_or_else(invalid);
        }

        let caps = UTC_OFFSET.captures(trimmed).ok_or_else(invalid)?;
        let sign = if &caps[1] == "-" { -1 } else { 1 };
        let hours: i32 = caps[2].parse().map_err(|_| invalid())?;
        let minutes: i32 = caps[3].parse().map_err(|_| invalid())?;
        if hours > 14 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
    }

    pub fn timezone(&self) -> Option<FixedOffset> {
        self.timezone
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// `None` when the attribute type is unknown, `""` for an unset value
    pub fn display(&self, ty: Option<AttributeType>, value: Option<&AttributeValue>) -> Option<String> {
        ty?;
        Some(value.map(|v| self.format(v)).unwrap_or_default())
    }

    pub fn format(&self, value: &AttributeValue) -> String {
        match value {
            AttributeValue::Boolean(v) => v.to_string(),
            AttributeValue::Integer(v) => v.to_string(),
            AttributeValue::Char(v) => v.clone(),
            AttributeValue::Float(v) => v.to_string(),
            AttributeValue::Numeric(v) => v.to_string(),
            AttributeValue::Date(v) => v.format(&self.date_format).to_string(),
            AttributeValue::DateTime(v) => {
                let utc = Utc.from_utc_datetime(v);
                match self.timezone {
                    Some(offset) => utc.with_timezone(&offset).format(DATETIME_FORMAT).to_string(),
                    None => utc.format(DATETIME_FORMAT).to_string(),
                }
            }
            AttributeValue::Selection(choice) => choice.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::SelectionChoice;
    use chrono::NaiveDate;

    fn sample_datetime() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(23, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_unknown_type_displays_nothing() {
        let policy = FormatPolicy::default();
        assert_eq!(policy.display(None, Some(&AttributeValue::Integer(1))), None);
    }

    #[test]
    fn test_unset_value_displays_empty() {
        let policy = FormatPolicy::default();
        assert_eq!(policy.display(Some(AttributeType::Selection), None), Some(String::new()));
        assert_eq!(policy.display(Some(AttributeType::Char), None), Some(String::new()));
    }

    #[test]
    fn test_selection_displays_option_name() {
        let policy = FormatPolicy::default();
        let value = AttributeValue::Selection(SelectionChoice {
            id: 1,
            name: "Blue".to_string(),
        });
        assert_eq!(policy.format(&value), "Blue");
    }

    #[test]
    fn test_date_uses_default_pattern() {
        let policy = FormatPolicy::default();
        let value = AttributeValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(policy.format(&value), "2024-03-01");
    }

    #[test]
    fn test_date_uses_locale_pattern() {
        let policy = FormatPolicy::new(None, "%d/%m/%Y").unwrap();
        let value = AttributeValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(policy.format(&value), "01/03/2024");
    }

    #[test]
    fn test_datetime_without_timezone_is_utc() {
        let policy = FormatPolicy::default();
        let value = AttributeValue::DateTime(sample_datetime());
        assert_eq!(policy.format(&value), "2024-03-01 23:30:05");
    }

    #[test]
    fn test_datetime_is_localised_to_company_offset() {
        let offset = FormatPolicy::parse_offset("+02:00").unwrap();
        let policy = FormatPolicy::new(Some(offset), DEFAULT_DATE_FORMAT).unwrap();
        let value = AttributeValue::DateTime(sample_datetime());
        assert_eq!(policy.format(&value), "2024-03-02 01:30:05");
    }

    #[test]
    fn test_numbers_and_booleans() {
        let policy = FormatPolicy::default();
        assert_eq!(policy.format(&AttributeValue::Boolean(true)), "true");
        assert_eq!(policy.format(&AttributeValue::Integer(-3)), "-3");
        assert_eq!(policy.format(&AttributeValue::Float(1.5)), "1.5");
        assert_eq!(
            policy.format(&AttributeValue::Numeric("10.50".parse().unwrap())),
            "10.50"
        );
    }

    #[test]
    fn test_parse_offset_variants() {
        assert_eq!(FormatPolicy::parse_offset("-05:30").unwrap().local_minus_utc(), -19800);
        assert_eq!(FormatPolicy::parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert!(FormatPolicy::parse_offset("0200").is_err());
        assert!(FormatPolicy::parse_offset("+25:00").is_err());
        assert!(FormatPolicy::parse_offset("Europe/Paris").is_err());
    }

    #[test]
    fn test_invalid_date_format_rejected() {
        assert!(matches!(
            FormatPolicy::new(None, "%Y-%Q"),
            Err(ConfigError::InvalidDateFormat(_))
        ));
    }
}
