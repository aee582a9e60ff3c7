use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid timezone offset '{0}', expected +HH:MM or -HH:MM")]
    InvalidTimezone(String),

    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),
}
