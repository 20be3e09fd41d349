//! Wire-format validation error
//!
//! The JSON shape matches the payload API clients already consume:
//! `{"code", "msg", "hmsg", "field_violations": [{"field", "code", "param",
//! "msg", "hmsg"}]}`.

use crate::report::Violations;
use crate::template::{self, MessageMap, TemplateMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use tenet_core::Result;

/// HTTP status a validation error maps to (Unprocessable Entity)
pub const HTTP_STATUS: u16 = 422;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub param: String,
    /// The rule's own message
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub msg: String,
    /// Rendered, human readable message
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hmsg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub msg: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hmsg: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_violations: Vec<FieldViolation>,
}

impl WireError {
    /// Translate violations, rendering `hmsg` with the given custom table
    pub fn from_violations(
        violations: Option<&Violations>,
        templates: Option<&TemplateMap>,
    ) -> Result<Self> {
        let mut field_violations = Vec::new();
        for violation in violations.into_iter().flatten() {
            field_violations.push(FieldViolation {
                field: violation.field.clone(),
                code: violation.code.clone(),
                param: violation.param.clone(),
                msg: violation.message.clone(),
                hmsg: template::render(violation, templates)?,
            });
        }
        Ok(Self {
            field_violations,
            ..Self::default()
        })
    }

    /// Promote a lone field violation's code and human message to the top
    /// level when the top-level code is unset
    pub fn normalized(mut self) -> Self {
        if self.code.is_empty() {
            if let [only] = self.field_violations.as_slice() {
                self.code = only.code.clone();
                self.hmsg = only.hmsg.clone();
            }
        }
        self
    }

    pub fn http_status(&self) -> u16 {
        HTTP_STATUS
    }

    pub fn is_empty(&self) -> bool {
        self.field_violations.is_empty()
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation error")
    }
}

impl std::error::Error for WireError {}

/// Marker for error types that report violations.
///
/// Caller-defined error records (usually [`ErrorTarget`] types) implement it
/// to be recognized by [`is_validation_error_as`].
///
/// [`ErrorTarget`]: crate::materialize::ErrorTarget
pub trait ValidationError: std::error::Error + 'static {}

impl ValidationError for Violations {}
impl ValidationError for MessageMap {}
impl ValidationError for WireError {}

/// Whether an error reports violations rather than an engine or
/// configuration failure
pub fn is_validation_error(err: &(dyn std::error::Error + 'static)) -> bool {
    err.is::<Violations>() || err.is::<MessageMap>() || err.is::<WireError>()
}

/// Like [`is_validation_error`], also accepting the caller's error record `T`
pub fn is_validation_error_as<T: ValidationError>(
    err: &(dyn std::error::Error + 'static),
) -> bool {
    err.is::<T>() || is_validation_error(err)
}
