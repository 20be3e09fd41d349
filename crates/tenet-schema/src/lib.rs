//! Tenet Schema - Record introspection without reflection
//!
//! Record types register an accessor table ([`RecordSchema`]) once; the
//! resolver walks dotted paths through nested records using those tables,
//! renaming segments under an optional naming scheme.

mod json;
mod record;
mod resolve;
mod value;

pub use json::from_json;
pub use record::{is_record_zero, Described, Getter, Record, RecordSchema, ALIAS_IGNORE};
pub use resolve::{resolve, Resolved, PATH_SEPARATOR};
pub use value::Value;
