//! Rule definitions

use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;

/// An error carried from a rule into every violation it produces
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// One declarative constraint binding applied to one field path
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rule {
    /// Dotted field path, e.g. `Address.City`
    pub field: String,
    /// Comma-separated constraint tokens, e.g. `required,lte=20`
    #[serde(alias = "tag")]
    pub constraints: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(skip)]
    pub cause: Option<Cause>,
}

impl Rule {
    pub fn new(field: impl Into<String>, constraints: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraints: constraints.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Attach an already shared cause so callers can compare it by identity
    pub fn with_shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }
}
