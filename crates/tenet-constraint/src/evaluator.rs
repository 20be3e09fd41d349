//! Rule evaluation engine

use crate::materialize::{self, ErrorTarget};
use crate::registry::PredicateRegistry;
use crate::report::{Violation, Violations};
use crate::tag::{self, ConstraintToken};
use crate::template::{self, MessageMap, TemplateMap};
use crate::types::Rule;
use crate::wire::WireError;
use tenet_core::{Literal, Result, TenetError};
use tenet_schema::{resolve, Record, Value};

/// Cross-field constraint comparing a field with another field for equality
pub const EQ_FIELD: &str = "eqfield";
/// Cross-field constraint requiring two fields to differ
pub const NE_FIELD: &str = "nefield";

fn is_cross_field(name: &str) -> bool {
    name == EQ_FIELD || name == NE_FIELD
}

/// Compare two resolved values with a cross-field constraint.
///
/// Unknown constraint names never pass.
pub fn cross_field(a: &Value<'_>, b: &Value<'_>, name: &str) -> bool {
    match name {
        EQ_FIELD => a == b,
        NE_FIELD => a != b,
        _ => false,
    }
}

/// Collects predicates, inclusion lists and templates before evaluation
#[derive(Debug, Clone)]
pub struct ValidatorBuilder {
    registry: PredicateRegistry,
    templates: Option<TemplateMap>,
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorBuilder {
    /// Create a builder seeded with the built-in predicates
    pub fn new() -> Self {
        Self {
            registry: PredicateRegistry::with_builtins(),
            templates: None,
        }
    }

    /// Register a predicate, replacing any existing entry with the same name
    pub fn register<F>(&mut self, name: &str, check: F)
    where
        F: Fn(&Value<'_>, &str) -> bool + Send + Sync + 'static,
    {
        self.registry.register(name, check);
    }

    /// Register a regex predicate over the value's text form
    pub fn register_pattern(&mut self, name: &str, pattern: &str) -> Result<()> {
        self.registry.register_pattern(name, pattern)
    }

    /// Register the allowed values for `inclusion=<param>`
    pub fn register_inclusion<I, V>(&mut self, param: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Literal>,
    {
        self.registry.register_inclusion(param, values)
    }

    /// Install a custom template table.
    ///
    /// Every entry is parsed first; on failure the previously installed
    /// table stays in place.
    pub fn register_templates(&mut self, templates: TemplateMap) -> Result<()> {
        template::check_templates(&templates)?;
        tracing::debug!(count = templates.len(), "registered custom templates");
        self.templates = Some(templates);
        Ok(())
    }

    pub fn templates(&self) -> Option<&TemplateMap> {
        self.templates.as_ref()
    }

    /// Freeze the registrations into a validator
    pub fn build(self) -> Validator {
        Validator {
            registry: self.registry,
            templates: self.templates,
        }
    }
}

/// Evaluates rules against records.
///
/// Immutable once built, so a single validator can be shared across threads.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: PredicateRegistry,
    templates: Option<TemplateMap>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// A validator with only the built-in predicates and templates
    pub fn new() -> Self {
        ValidatorBuilder::new().build()
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    /// The custom template table, if one was registered
    pub fn templates(&self) -> Option<&TemplateMap> {
        self.templates.as_ref()
    }

    /// Run every rule against `data`.
    ///
    /// Returns `Ok(None)` when nothing was violated. Any fatal condition
    /// aborts the whole call and discards violations found so far.
    pub fn validate(&self, data: &dyn Record, rules: &[Rule]) -> Result<Option<Violations>> {
        self.validate_with_scheme(data, rules, "")
    }

    /// Like [`Validator::validate`], reporting field paths under the naming
    /// scheme's aliases
    pub fn validate_with_scheme(
        &self,
        data: &dyn Record,
        rules: &[Rule],
        scheme: &str,
    ) -> Result<Option<Violations>> {
        if !data.is_record() {
            return Err(TenetError::DataShape(data.type_name().to_string()));
        }

        let mut violations = Violations::new();
        for rule in rules {
            self.evaluate_rule(data, rule, scheme, &mut violations)?;
        }

        tracing::debug!(
            rules = rules.len(),
            violations = violations.len(),
            scheme,
            "validation finished"
        );
        Ok(violations.into_option())
    }

    fn evaluate_rule(
        &self,
        data: &dyn Record,
        rule: &Rule,
        scheme: &str,
        violations: &mut Violations,
    ) -> Result<()> {
        let unreachable = || TenetError::FieldResolution {
            field: rule.field.clone(),
        };
        let resolved = resolve(data, &rule.field, scheme).ok_or_else(unreachable)?;
        tracing::debug!(field = %rule.field, constraints = %rule.constraints, "evaluating rule");

        let mut direct = Vec::new();
        for raw in tag::split(&rule.constraints) {
            let name = tag::name_of(raw);
            if !is_cross_field(name) {
                direct.push(raw);
                continue;
            }

            let other = resolve(data, tag::param_of(raw), "").ok_or_else(unreachable)?;
            if !cross_field(&resolved.value, &other.value, name) {
                violations.push(violation(rule, &resolved.path, name, ""));
            }
        }

        if !direct.is_empty() {
            let spec = direct.join(",");
            if let Some(token) = self.registry.check(&resolved.value, &spec)? {
                violations.push(violation(rule, &resolved.path, &token.name, &token.param));
            }
        }

        Ok(())
    }

    /// Validate and render every violation with the custom template table
    pub fn validate_to_messages(
        &self,
        data: &dyn Record,
        rules: &[Rule],
    ) -> Result<Option<MessageMap>> {
        self.validate_to_messages_with_scheme(data, rules, "")
    }

    pub fn validate_to_messages_with_scheme(
        &self,
        data: &dyn Record,
        rules: &[Rule],
        scheme: &str,
    ) -> Result<Option<MessageMap>> {
        match self.validate_with_scheme(data, rules, scheme)? {
            Some(violations) => Ok(Some(violations.to_message_map(self.templates())?)),
            None => Ok(None),
        }
    }

    /// Validate into the wire error shape; the field list is empty when
    /// nothing was violated
    pub fn validate_to_wire(&self, data: &dyn Record, rules: &[Rule]) -> Result<WireError> {
        let violations = self.validate(data, rules)?;
        WireError::from_violations(violations.as_ref(), self.templates())
    }

    /// Validate and copy messages and causes onto an error record
    pub fn validate_into<T: ErrorTarget>(
        &self,
        data: &dyn Record,
        rules: &[Rule],
        target: &mut Option<T>,
    ) -> Result<()> {
        let violations = self.validate(data, rules)?;
        materialize::apply(violations.as_ref(), target);
        Ok(())
    }

    /// Like [`Validator::validate_into`], but leaves `None` behind when
    /// nothing was violated
    pub fn validate_into_and_clear<T: ErrorTarget>(
        &self,
        data: &dyn Record,
        rules: &[Rule],
        target: &mut Option<T>,
    ) -> Result<()> {
        let violations = self.validate(data, rules)?;
        materialize::apply_and_clear(violations.as_ref(), target);
        Ok(())
    }

    /// Check a single value against a constraint spec.
    ///
    /// Returns the failing token, or an empty list when the value passes.
    pub fn check(&self, value: &Value<'_>, spec: &str) -> Result<Vec<ConstraintToken>> {
        Ok(self.registry.check(value, spec)?.into_iter().collect())
    }

    /// Whether a value passes a constraint spec. Unusable specs never pass.
    pub fn is_valid(&self, value: &Value<'_>, spec: &str) -> bool {
        matches!(self.check(value, spec), Ok(failed) if failed.is_empty())
    }
}

fn violation(rule: &Rule, field: &str, constraint: &str, param: &str) -> Violation {
    Violation {
        field: field.to_string(),
        constraint: constraint.to_string(),
        param: param.to_string(),
        code: rule.code.clone(),
        message: rule.message.clone(),
        cause: rule.cause.clone(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const FIELDS: &[&str] = &["Name", "Age", "Email", "Gender"];
    const SPECS: &[&str] = &[
        "required",
        "min=18",
        "lte=3",
        "simple_email",
        "inclusion=gender",
        "eqfield=Name",
        "-",
    ];

    fn rules() -> impl Strategy<Value = Vec<Rule>> {
        prop::collection::vec(
            (prop::sample::select(FIELDS), prop::sample::select(SPECS))
                .prop_map(|(field, spec)| Rule::new(field, spec)),
            0..12,
        )
    }

    proptest! {
        /// Violations come out rule by rule and re-running gives the same set.
        #[test]
        fn violations_follow_rule_order(
            rules in rules(),
            name in "[a-z ]{0,6}",
            age in 0i64..40,
        ) {
            let data = json!({"Name": name, "Age": age, "Email": "a@b", "Gender": "X"});
            let validator = Validator::new();

            let first = validator.validate(&data, &rules).unwrap();
            let second = validator.validate(&data, &rules).unwrap();
            prop_assert_eq!(&first, &second);

            // Each rule contributes exactly what it reports alone, in rule order.
            let mut expected = Vec::new();
            for rule in &rules {
                let alone = validator
                    .validate(&data, std::slice::from_ref(rule))
                    .unwrap()
                    .unwrap_or_default();
                expected.extend(alone.into_iter().map(|v| (v.field, v.constraint, v.param)));
            }

            let actual: Vec<(String, String, String)> = first
                .unwrap_or_default()
                .into_iter()
                .map(|v| (v.field, v.constraint, v.param))
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
