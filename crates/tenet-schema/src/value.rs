//! Borrowed field values handed out by record accessors

use crate::record::{is_record_zero, Record};
use std::fmt;
use tenet_core::Literal;

/// A field value borrowed from a record.
///
/// `Absent` stands for an empty optional (a `None` reference); resolution
/// never walks through it.
#[derive(Clone)]
pub enum Value<'a> {
    Absent,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
    List(Vec<Value<'a>>),
    Record(&'a dyn Record),
}

impl<'a> Value<'a> {
    /// Wrap a nested record
    pub fn record<R: Record>(record: &'a R) -> Self {
        Value::Record(record)
    }

    /// Wrap an optional nested record, `None` becomes `Absent`
    pub fn optional_record<R: Record>(record: Option<&'a R>) -> Self {
        match record {
            Some(r) => Value::Record(r),
            None => Value::Absent,
        }
    }

    /// Build a list value from any iterator of convertible items
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value<'a>>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Str(s) => Some(*s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Whether the value equals the zero value of its type.
    ///
    /// A record is zero when every declared field is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Bool(b) => !b,
            Value::Int(n) => *n == 0,
            Value::UInt(n) => *n == 0,
            Value::Float(n) => *n == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Record(r) => is_record_zero(*r),
        }
    }

    /// Numeric view used by ordering comparisons
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::UInt(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Compare against an owned literal, numbers compare across widths
    pub fn matches_literal(&self, literal: &Literal) -> bool {
        match (self, literal) {
            (Value::Str(a), Literal::Str(b)) => *a == b.as_str(),
            (Value::Bool(a), Literal::Bool(b)) => a == b,
            (Value::Int(a), Literal::Int(b)) => a == b,
            (Value::UInt(a), Literal::Int(b)) => u64::try_from(*b).map(|b| *a == b).unwrap_or(false),
            (Value::Float(a), Literal::Float(b)) => a == b,
            (Value::Float(a), Literal::Int(b)) => *a == *b as f64,
            (Value::Int(a), Literal::Float(b)) => *a as f64 == *b,
            _ => false,
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => std::ptr::addr_eq(*a, *b),
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
                u64::try_from(*a).map(|a| a == *b).unwrap_or(false)
            }
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("Absent"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::UInt(n) => write!(f, "UInt({})", n),
            Value::Float(n) => write!(f, "Float({})", n),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Record(r) => write!(f, "Record({})", r.type_name()),
        }
    }
}

/// The text form used by pattern predicates
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Record(r) => write!(f, "<{}>", r.type_name()),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value<'_> {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value<'_> {
    fn from(value: u32) -> Self {
        Value::UInt(value as u64)
    }
}

impl From<u64> for Value<'_> {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<usize> for Value<'_> {
    fn from(value: usize) -> Self {
        Value::UInt(value as u64)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}
