//! Built-in predicates
//!
//! Each built-in takes the field value and the token's parameter. An `Err`
//! means the constraint itself is unusable for this value (a non-numeric
//! bound, a field type the check has no meaning for) and aborts evaluation.

use regex::Regex;
use std::cmp::Ordering;
use std::net::Ipv4Addr;
use std::sync::LazyLock;
use tenet_schema::Value;

/// Signature shared by all built-in predicates
pub type BuiltinFn = fn(&Value<'_>, &str) -> Result<bool, String>;

/// ASCII digits only; `\d` would also admit full-width and other scripts
pub const ZIPCODE_JP_PATTERN: &str = r"^[0-9]{3}-[0-9]{4}$";
/// Only ASCII whitespace separates the parts
pub const SIMPLE_EMAIL_PATTERN: &str = r"^[^\t\n\f\r @]+@[^\t\n\f\r @]+$";

/// Compiled once, cloned into every registry.
pub(crate) static ZIPCODE_JP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ZIPCODE_JP_PATTERN).expect("valid regex"));
pub(crate) static SIMPLE_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SIMPLE_EMAIL_PATTERN).expect("valid regex"));

pub(crate) const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("required", required),
    ("strict_required", strict_required),
    ("len", len),
    ("min", min),
    ("max", max),
    ("eq", eq),
    ("ne", ne),
    ("lt", lt),
    ("lte", lte),
    ("gt", gt),
    ("gte", gte),
    ("oneof", oneof),
    ("ipv4", ipv4),
];

fn required(value: &Value<'_>, _param: &str) -> Result<bool, String> {
    Ok(!value.is_zero())
}

/// Non-blank after trimming whitespace
fn strict_required(value: &Value<'_>, _param: &str) -> Result<bool, String> {
    Ok(!value.to_string().trim().is_empty())
}

fn len(value: &Value<'_>, param: &str) -> Result<bool, String> {
    Ok(compare(value, param)? == Ordering::Equal)
}

fn min(value: &Value<'_>, param: &str) -> Result<bool, String> {
    Ok(compare(value, param)? != Ordering::Less)
}

fn max(value: &Value<'_>, param: &str) -> Result<bool, String> {
    Ok(compare(value, param)? != Ordering::Greater)
}

fn lt(value: &Value<'_>, param: &str) -> Result<bool, String> {
    Ok(compare(value, param)? == Ordering::Less)
}

fn lte(value: &Value<'_>, param: &str) -> Result<bool, String> {
    Ok(compare(value, param)? != Ordering::Greater)
}

fn gt(value: &Value<'_>, param: &str) -> Result<bool, String> {
    Ok(compare(value, param)? == Ordering::Greater)
}

fn gte(value: &Value<'_>, param: &str) -> Result<bool, String> {
    Ok(compare(value, param)? != Ordering::Less)
}

/// Strings compare by content, everything else by `compare`
fn eq(value: &Value<'_>, param: &str) -> Result<bool, String> {
    match value {
        Value::Str(s) => Ok(*s == param),
        Value::Bool(b) => Ok(*b == parse::<bool>(param)?),
        _ => Ok(compare(value, param)? == Ordering::Equal),
    }
}

fn ne(value: &Value<'_>, param: &str) -> Result<bool, String> {
    eq(value, param).map(|equal| !equal)
}

/// Membership in a space-separated list of allowed values
fn oneof(value: &Value<'_>, param: &str) -> Result<bool, String> {
    let mut allowed = param.split_whitespace();
    match value {
        Value::Str(s) => Ok(allowed.any(|candidate| candidate == *s)),
        Value::Int(n) => {
            for candidate in allowed {
                if parse::<i64>(candidate)? == *n {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Value::UInt(n) => {
            for candidate in allowed {
                if parse::<u64>(candidate)? == *n {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        other => Err(format!("bad field type {}", other.type_name())),
    }
}

fn ipv4(value: &Value<'_>, _param: &str) -> Result<bool, String> {
    Ok(value.to_string().parse::<Ipv4Addr>().is_ok())
}

/// Order the value against the parameter.
///
/// Strings are measured in characters and lists in elements; numbers compare
/// by value against a parameter parsed as the same kind of number.
fn compare(value: &Value<'_>, param: &str) -> Result<Ordering, String> {
    match value {
        Value::Str(s) => Ok(s.chars().count().cmp(&parse::<usize>(param)?)),
        Value::List(items) => Ok(items.len().cmp(&parse::<usize>(param)?)),
        Value::Int(n) => Ok(n.cmp(&parse::<i64>(param)?)),
        Value::UInt(n) => Ok(n.cmp(&parse::<u64>(param)?)),
        Value::Float(n) => n
            .partial_cmp(&parse::<f64>(param)?)
            .ok_or_else(|| "NaN is not comparable".to_string()),
        other => Err(format!("bad field type {}", other.type_name())),
    }
}

fn parse<T: std::str::FromStr>(param: &str) -> Result<T, String> {
    param
        .parse::<T>()
        .map_err(|_| format!("invalid parameter '{}'", param))
}
