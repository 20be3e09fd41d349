//! Violation report types

use crate::template::{self, MessageMap, TemplateMap};
use crate::types::Cause;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tenet_core::Result;

/// A single failed constraint token
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Field path, renamed when a naming scheme was requested
    pub field: String,
    pub constraint: String,
    pub param: String,
    pub code: String,
    pub message: String,
    #[serde(skip)]
    pub cause: Option<Cause>,
}

impl PartialEq for Violation {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_cause
            && self.field == other.field
            && self.constraint == other.constraint
            && self.param == other.param
            && self.code == other.code
            && self.message == other.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.constraint)?;
        if !self.param.is_empty() {
            write!(f, "={}", self.param)?;
        }
        write!(f, " of {}", self.field)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Ordered violations from one evaluation call: rule order, then token order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// `None` when nothing was violated
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Render every violation, grouped by field path
    pub fn to_message_map(&self, custom: Option<&TemplateMap>) -> Result<MessageMap> {
        let mut messages = MessageMap::new();
        for violation in self.iter() {
            messages.push(&violation.field, template::render(violation, custom)?);
        }
        Ok(messages)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        f.write_str("validation failed: ")?;
        for (i, violation) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
