//! Record accessor schemas
//!
//! A record type describes itself once through a [`RecordSchema`]: an ordered
//! table of field getters plus, per naming scheme, the external name each
//! field is reported under.

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// Alias value that hides a field from a naming scheme
pub const ALIAS_IGNORE: &str = "-";

/// A structural record whose fields can be looked up by name.
pub trait Record {
    /// Name of the record type, used in diagnostics
    fn type_name(&self) -> &str;

    /// Look up a field by its declared name
    fn field(&self, name: &str) -> Option<Value<'_>>;

    /// External name of `field` under `scheme`, if one is registered
    fn alias(&self, _field: &str, _scheme: &str) -> Option<&str> {
        None
    }

    /// Declared field names, in declaration order
    fn field_names(&self) -> Vec<&str>;

    /// Whether this value is a record at all.
    ///
    /// Dynamic records (such as JSON values) may hold a scalar instead.
    fn is_record(&self) -> bool {
        true
    }
}

/// Types that describe their fields with a static [`RecordSchema`]
pub trait Described: Sized + 'static {
    fn schema() -> &'static RecordSchema<Self>;
}

impl<T: Described> Record for T {
    fn type_name(&self) -> &str {
        &T::schema().name
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        T::schema().get(self, name)
    }

    fn alias(&self, field: &str, scheme: &str) -> Option<&str> {
        T::schema().alias_for(field, scheme)
    }

    fn field_names(&self) -> Vec<&str> {
        T::schema().field_names()
    }
}

/// Getter for one field of `T`
pub type Getter<T> = for<'a> fn(&'a T) -> Value<'a>;

struct FieldDef<T> {
    name: String,
    get: Getter<T>,
}

/// Accessor table for a record type
pub struct RecordSchema<T> {
    pub name: String,
    fields: Vec<FieldDef<T>>,
    /// scheme -> field -> raw alias text
    aliases: HashMap<String, HashMap<String, String>>,
}

impl<T> RecordSchema<T> {
    /// Create an empty schema for a record type.
    ///
    /// Getter closures take their parameter type from `T`, so name it at the
    /// call: `RecordSchema::<Address>::new("Address")`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// Declare a field and its getter. Redeclaring a name replaces the getter.
    pub fn field(mut self, name: impl Into<String>, get: Getter<T>) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.get = get,
            None => self.fields.push(FieldDef { name, get }),
        }
        self
    }

    /// Register the external name of a field under a naming scheme.
    ///
    /// The text follows serialization-tag conventions: only the first
    /// comma-separated component is used, and `-` hides the field.
    pub fn alias(
        mut self,
        scheme: impl Into<String>,
        field: impl Into<String>,
        external: impl Into<String>,
    ) -> Self {
        self.aliases
            .entry(scheme.into())
            .or_default()
            .insert(field.into(), external.into());
        self
    }

    /// Read a field from a record
    pub fn get<'a>(&self, record: &'a T, name: &str) -> Option<Value<'a>> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| (f.get)(record))
    }

    /// The external name of a field, or `None` when absent or ignored
    pub fn alias_for(&self, field: &str, scheme: &str) -> Option<&str> {
        let raw = self.aliases.get(scheme)?.get(field)?;
        if raw == ALIAS_IGNORE {
            return None;
        }
        raw.split(',').next().filter(|name| !name.is_empty())
    }

    /// List all field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// Return true when every declared field of the record holds its zero value.
pub fn is_record_zero(record: &dyn Record) -> bool {
    record
        .field_names()
        .into_iter()
        .all(|name| record.field(name).map(|v| v.is_zero()).unwrap_or(true))
}
