use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attributes::format::DEFAULT_DATE_FORMAT;
use crate::attributes::FormatPolicy;
use crate::database::DEFAULT_DATABASE;
use crate::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub database: String,
    pub log_level: String,
    pub formatting: FormattingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// Company offset as `+HH:MM`; datetimes are shown in UTC when unset
    pub timezone: Option<String>,
    pub date_format: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            log_level: "info".to_string(),
            formatting: FormattingConfig::default(),
        }
    }
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: CatalogConfig = serde_yaml::from_str(content)?;
        config.format_policy()?;
        Ok(config)
    }

    /// Defaults when `path` does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn format_policy(&self) -> Result<FormatPolicy, ConfigError> {
        let timezone = self
            .formatting
            .timezone
            .as_deref()
            .map(FormatPolicy::parse_offset)
            .transpose()?;
        FormatPolicy::new(timezone, self.formatting.date_format.clone())
    }
}
