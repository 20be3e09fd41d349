//! Error types for Tenet

use thiserror::Error;

/// The main error type for Tenet operations
///
/// Every variant is fatal for the call that produced it: an evaluation that
/// returns an error never hands back a partial set of violations.
#[derive(Debug, Error)]
pub enum TenetError {
    #[error("get value from {field} field failed")]
    FieldResolution { field: String },

    #[error("invalid constraint '{constraint}': {reason}")]
    InvalidConstraint { constraint: String, reason: String },

    #[error("data should be a record or a reference to one: {0}")]
    DataShape(String),

    #[error("inclusion parameter name can not be empty")]
    EmptyParameterName,

    #[error("template error in '{template}': {reason}")]
    Template { template: String, reason: String },

    #[error("invalid pattern for '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Rule load error: {0}")]
    RuleLoadError(String),
}

impl TenetError {
    pub fn invalid_constraint(constraint: impl Into<String>, reason: impl Into<String>) -> Self {
        TenetError::InvalidConstraint {
            constraint: constraint.into(),
            reason: reason.into(),
        }
    }

    pub fn template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        TenetError::Template {
            template: template.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Tenet operations
pub type Result<T> = std::result::Result<T, TenetError>;

impl From<toml::de::Error> for TenetError {
    fn from(err: toml::de::Error) -> Self {
        TenetError::TomlParseError(err.to_string())
    }
}

impl From<serde_json::Error> for TenetError {
    fn from(err: serde_json::Error) -> Self {
        TenetError::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_resolution_message() {
        let err = TenetError::FieldResolution {
            field: "Address.City".to_string(),
        };
        assert_eq!(err.to_string(), "get value from Address.City field failed");
    }

    #[test]
    fn test_toml_error_conversion() {
        let err: TenetError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, TenetError::TomlParseError(_)));
    }
}
