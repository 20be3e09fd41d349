//! Copy violations onto a caller-defined error record
//!
//! Error records declare which of their fields receive rendered rule
//! messages and which receive causes, keyed by the (renamed) field path that
//! violations report.

use crate::report::Violations;
use crate::types::Cause;
use std::collections::HashMap;

/// Where a group of violations lands on the target record
pub enum Slot<T> {
    Messages(fn(&mut T) -> &mut Vec<String>),
    Causes(fn(&mut T) -> &mut Vec<Cause>),
}

/// Slot table for an error record type
pub struct TargetSchema<T> {
    slots: HashMap<String, Vec<Slot<T>>>,
}

impl<T> Default for TargetSchema<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T> TargetSchema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive the rule messages of violations on `field`
    pub fn messages(
        mut self,
        field: impl Into<String>,
        slot: fn(&mut T) -> &mut Vec<String>,
    ) -> Self {
        self.slots
            .entry(field.into())
            .or_default()
            .push(Slot::Messages(slot));
        self
    }

    /// Receive the causes of violations on `field`
    pub fn causes(
        mut self,
        field: impl Into<String>,
        slot: fn(&mut T) -> &mut Vec<Cause>,
    ) -> Self {
        self.slots
            .entry(field.into())
            .or_default()
            .push(Slot::Causes(slot));
        self
    }

    fn slots(&self, field: &str) -> &[Slot<T>] {
        self.slots.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// An error record that violations can be copied onto
pub trait ErrorTarget: Default + 'static {
    fn target_schema() -> &'static TargetSchema<Self>;
}

#[derive(Default)]
struct Group {
    messages: Vec<String>,
    causes: Vec<Cause>,
}

/// Group messages and causes by field path in first-appearance order
fn group(violations: &Violations) -> Vec<(&str, Group)> {
    let mut groups: Vec<(&str, Group)> = Vec::new();
    for violation in violations {
        let index = match groups.iter().position(|(field, _)| *field == violation.field) {
            Some(index) => index,
            None => {
                groups.push((violation.field.as_str(), Group::default()));
                groups.len() - 1
            }
        };
        let group = &mut groups[index].1;
        group.messages.push(violation.message.clone());
        if let Some(cause) = &violation.cause {
            group.causes.push(cause.clone());
        }
    }
    groups
}

/// Copy grouped violations onto `target`, creating it when `None`.
///
/// Fields the target does not declare are skipped. The target is never
/// cleared, even when there are no violations.
pub fn apply<T: ErrorTarget>(violations: Option<&Violations>, target: &mut Option<T>) {
    let record = target.get_or_insert_with(T::default);
    let Some(violations) = violations else {
        return;
    };

    let schema = T::target_schema();
    for (field, group) in group(violations) {
        let slots = schema.slots(field);
        if slots.is_empty() {
            tracing::debug!(field, "error target has no slot for field");
            continue;
        }
        for slot in slots {
            match slot {
                Slot::Messages(get) => *get(record) = group.messages.clone(),
                Slot::Causes(get) => *get(record) = group.causes.clone(),
            }
        }
    }
}

/// Like [`apply`], but leaves `None` when there are no violations
pub fn apply_and_clear<T: ErrorTarget>(violations: Option<&Violations>, target: &mut Option<T>) {
    match violations {
        Some(violations) if !violations.is_empty() => apply(Some(violations), target),
        _ => *target = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Violation;
    use std::sync::{Arc, LazyLock};

    #[derive(Debug, Default)]
    struct SignupErrors {
        name: Vec<String>,
        age: Vec<String>,
        age_causes: Vec<Cause>,
        untouched: Vec<String>,
    }

    static SIGNUP_ERRORS: LazyLock<TargetSchema<SignupErrors>> = LazyLock::new(|| {
        TargetSchema::<SignupErrors>::new()
            .messages("Name", |e| &mut e.name)
            .messages("Age", |e| &mut e.age)
            .causes("Age", |e| &mut e.age_causes)
            .messages("Untouched", |e| &mut e.untouched)
    });

    impl ErrorTarget for SignupErrors {
        fn target_schema() -> &'static TargetSchema<Self> {
            &SIGNUP_ERRORS
        }
    }

    fn violation(field: &str, message: &str, cause: Option<Cause>) -> Violation {
        Violation {
            field: field.to_string(),
            constraint: "required".to_string(),
            param: String::new(),
            code: String::new(),
            message: message.to_string(),
            cause,
        }
    }

    #[test]
    fn test_apply_groups_by_field() {
        let cause: Cause = Arc::new(std::io::Error::other("age"));
        let violations = Violations::from(vec![
            violation("Name", "name required", None),
            violation("Age", "age required", Some(cause.clone())),
            violation("Name", "name too long", None),
            violation("Unknown", "ignored", None),
        ]);

        let mut target: Option<SignupErrors> = None;
        apply(Some(&violations), &mut target);

        let errors = target.unwrap();
        assert_eq!(errors.name, vec!["name required", "name too long"]);
        assert_eq!(errors.age, vec!["age required"]);
        assert_eq!(errors.age_causes.len(), 1);
        assert!(Arc::ptr_eq(&errors.age_causes[0], &cause));
        assert!(errors.untouched.is_empty());
    }

    #[test]
    fn test_apply_without_violations_creates_empty_target() {
        let mut target: Option<SignupErrors> = None;
        apply(None, &mut target);
        assert!(target.unwrap().name.is_empty());
    }

    #[test]
    fn test_apply_keeps_unrelated_fields() {
        let mut target = Some(SignupErrors {
            untouched: vec!["kept".to_string()],
            ..SignupErrors::default()
        });
        let violations = Violations::from(vec![violation("Name", "name required", None)]);
        apply(Some(&violations), &mut target);

        let errors = target.unwrap();
        assert_eq!(errors.untouched, vec!["kept"]);
        assert_eq!(errors.name, vec!["name required"]);
    }

    #[test]
    fn test_apply_and_clear() {
        let mut target = Some(SignupErrors::default());
        apply_and_clear(None, &mut target);
        assert!(target.is_none());

        let mut target = Some(SignupErrors::default());
        apply_and_clear(Some(&Violations::new()), &mut target);
        assert!(target.is_none());

        let violations = Violations::from(vec![violation("Age", "too young", None)]);
        apply_and_clear(Some(&violations), &mut target);
        assert_eq!(target.unwrap().age, vec!["too young"]);
    }
}
