//! Tenet Constraint - Rule evaluation and violation reporting
//!
//! Rules bind a comma-separated constraint spec to a dotted field path.
//! A [`Validator`] resolves each field, runs its constraints through the
//! predicate registry and collects [`Violations`], which can be rendered
//! into messages, copied onto an error record, or shaped for the wire.

mod evaluator;
mod materialize;
mod predicates;
mod registry;
mod report;
mod ruleset;
mod tag;
mod template;
mod types;
mod wire;

pub use evaluator::{cross_field, Validator, ValidatorBuilder, EQ_FIELD, NE_FIELD};
pub use materialize::{apply, apply_and_clear, ErrorTarget, Slot, TargetSchema};
pub use predicates::{BuiltinFn, SIMPLE_EMAIL_PATTERN, ZIPCODE_JP_PATTERN};
pub use registry::{Predicate, PredicateFn, PredicateRegistry, INCLUSION, SKIP_SPEC};
pub use report::{Violation, Violations};
pub use ruleset::{RuleFile, RuleSet, ValidatorConfig};
pub use tag::{name_of, param_of, split, ConstraintToken, PARAM_SEPARATOR, TOKEN_SEPARATOR};
pub use template::{check_templates, fallback_message, render, MessageMap, Template, TemplateMap};
pub use types::{Cause, Rule};
pub use wire::{
    is_validation_error, is_validation_error_as, FieldViolation, ValidationError, WireError,
    HTTP_STATUS,
};
