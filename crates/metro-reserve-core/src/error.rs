//! Error types for metro-reserve-core
//!
//! Only configuration and startup problems are errors. Failed reservation
//! attempts are ordinary values (see [`crate::retry::AttemptOutcome`]).

use thiserror::Error;

/// Result type alias using metro-reserve-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for metro-reserve
#[derive(Error, Debug)]
pub enum Error {
    /// Retry policy values are out of range
    #[error("Invalid retry policy: {message}")]
    InvalidPolicy { message: String },

    /// No bearer credential was supplied
    #[error("Missing credential: an authorization token is required")]
    MissingCredential,

    /// Credential cannot be sent as an HTTP header value
    #[error("Invalid credential: {message}")]
    InvalidCredential { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Duration string could not be parsed
    #[error("Invalid duration '{value}': expected e.g. 500ms, 1s, 2m, 1h or bare seconds")]
    InvalidDuration { value: String },

    /// Enter date is not a YYYYMMDD calendar date
    #[error("Invalid date '{value}': expected YYYYMMDD")]
    InvalidDate { value: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid policy error
    pub fn invalid_policy(message: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            message: message.into(),
        }
    }

    /// Create an invalid credential error
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid duration error
    pub fn invalid_duration(value: impl Into<String>) -> Self {
        Self::InvalidDuration {
            value: value.into(),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Whether this error stems from user-supplied configuration
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_policy_message() {
        let err = Error::invalid_policy("interval must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid retry policy: interval must be positive"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_io_is_not_configuration() {
        let err = Error::from(std::io::Error::other("disk"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_invalid_duration_mentions_value() {
        let err = Error::invalid_duration("tomorrow");
        assert!(err.to_string().contains("'tomorrow'"));
    }
}
