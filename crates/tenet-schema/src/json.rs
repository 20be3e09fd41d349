//! JSON documents as records

use crate::record::Record;
use crate::value::Value;

/// Convert a JSON value into a borrowed field value
pub fn from_json(value: &serde_json::Value) -> Value<'_> {
    match value {
        serde_json::Value::Null => Value::Absent,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => Value::List(items.iter().map(from_json).collect()),
        serde_json::Value::Object(_) => Value::Record(value),
    }
}

/// Objects are records keyed by their member names; any other JSON value is
/// not a record and has no fields.
impl Record for serde_json::Value {
    fn type_name(&self) -> &str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "bool",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.as_object()?.get(name).map(from_json)
    }

    fn field_names(&self) -> Vec<&str> {
        self.as_object()
            .map(|members| members.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn is_record(&self) -> bool {
        self.is_object()
    }
}
