//! Predicate registry: constraint name to check

use crate::predicates::{BuiltinFn, BUILTINS, SIMPLE_EMAIL_RE, ZIPCODE_JP_RE};
use crate::tag::{self, ConstraintToken};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tenet_core::{Literal, Result, TenetError};
use tenet_schema::Value;

/// Name of the built-in inclusion predicate
pub const INCLUSION: &str = "inclusion";

/// A constraint spec that skips validation entirely
pub const SKIP_SPEC: &str = "-";

/// A caller-supplied predicate
pub type PredicateFn = Arc<dyn Fn(&Value<'_>, &str) -> bool + Send + Sync>;

/// A registered check
#[derive(Clone)]
pub enum Predicate {
    Builtin(BuiltinFn),
    Custom(PredicateFn),
    /// Matches the text form of the value
    Pattern(Regex),
    /// Membership in the inclusion list named by the parameter
    Inclusion,
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Builtin(_) => f.write_str("Builtin"),
            Predicate::Custom(_) => f.write_str("Custom"),
            Predicate::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            Predicate::Inclusion => f.write_str("Inclusion"),
        }
    }
}

/// Registry mapping constraint names to predicates, plus the inclusion lists
/// consulted by the `inclusion` predicate
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Predicate>,
    inclusions: HashMap<String, Vec<Literal>>,
}

impl PredicateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in predicates
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, check) in BUILTINS {
            registry.insert(name, Predicate::Builtin(*check));
        }
        registry.insert("zipcode_jp", Predicate::Pattern(ZIPCODE_JP_RE.clone()));
        registry.insert("simple_email", Predicate::Pattern(SIMPLE_EMAIL_RE.clone()));
        registry.insert("email", Predicate::Pattern(SIMPLE_EMAIL_RE.clone()));
        registry.insert(INCLUSION, Predicate::Inclusion);
        registry
    }

    fn insert(&mut self, name: &str, predicate: Predicate) {
        if self.predicates.insert(name.to_string(), predicate).is_some() {
            tracing::debug!(name, "replaced predicate");
        }
    }

    /// Register a predicate, replacing any existing entry with the same name
    pub fn register<F>(&mut self, name: &str, check: F)
    where
        F: Fn(&Value<'_>, &str) -> bool + Send + Sync + 'static,
    {
        self.insert(name, Predicate::Custom(Arc::new(check)));
    }

    /// Register a predicate that matches the value's text against `pattern`
    pub fn register_pattern(&mut self, name: &str, pattern: &str) -> Result<()> {
        let re = Regex::new(pattern).map_err(|e| TenetError::InvalidPattern {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.insert(name, Predicate::Pattern(re));
        Ok(())
    }

    /// Register the allowed values for `inclusion=<param>`.
    ///
    /// Registering the same parameter again replaces the previous list.
    pub fn register_inclusion<I, V>(&mut self, param: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Literal>,
    {
        if param.is_empty() {
            return Err(TenetError::EmptyParameterName);
        }
        let values: Vec<Literal> = values.into_iter().map(Into::into).collect();
        tracing::debug!(param, count = values.len(), "registered inclusion list");
        self.inclusions.insert(param.to_string(), values);
        Ok(())
    }

    /// Get a predicate by name
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Allowed values registered for an inclusion parameter
    pub fn inclusion(&self, param: &str) -> Option<&[Literal]> {
        self.inclusions.get(param).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluate a constraint spec against a single value.
    ///
    /// Every token must name a registered predicate before any is evaluated.
    /// Tokens run in order and evaluation stops at the first failure, which
    /// is returned. An empty spec or `-` checks nothing.
    pub fn check(&self, value: &Value<'_>, spec: &str) -> Result<Option<ConstraintToken>> {
        if spec.is_empty() || spec == SKIP_SPEC {
            return Ok(None);
        }

        let mut planned = Vec::new();
        for raw in tag::split(spec) {
            let token = ConstraintToken::parse(raw);
            let predicate = self.get(&token.name).ok_or_else(|| {
                TenetError::invalid_constraint(raw, "undefined validation function")
            })?;
            planned.push((token, predicate));
        }

        for (token, predicate) in planned {
            let passed = self.evaluate(predicate, value, &token)?;
            tracing::trace!(constraint = %token.name, param = %token.param, passed);
            if !passed {
                return Ok(Some(token));
            }
        }

        Ok(None)
    }

    fn evaluate(
        &self,
        predicate: &Predicate,
        value: &Value<'_>,
        token: &ConstraintToken,
    ) -> Result<bool> {
        match predicate {
            Predicate::Builtin(check) => check(value, &token.param)
                .map_err(|reason| TenetError::invalid_constraint(&token.name, reason)),
            Predicate::Custom(check) => Ok(check(value, &token.param)),
            Predicate::Pattern(re) => Ok(re.is_match(&value.to_string())),
            // An unregistered list fails every value so the misconfiguration
            // shows up as a violation.
            Predicate::Inclusion => Ok(self
                .inclusion(&token.param)
                .map(|allowed| allowed.iter().any(|literal| value.matches_literal(literal)))
                .unwrap_or(false)),
        }
    }
}
