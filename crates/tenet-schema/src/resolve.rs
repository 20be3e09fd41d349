//! Nested field resolution

use crate::record::Record;
use crate::value::Value;

/// Separator between segments of a field path
pub const PATH_SEPARATOR: char = '.';

/// A field reached through a dotted path
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    pub value: Value<'a>,
    /// The path with every segment replaced by its alias under the scheme
    pub path: String,
}

/// Walk `path` from `root`, renaming segments under `scheme` when non-empty.
///
/// Returns `None` when the path is unreachable: a segment names an unknown
/// field, an intermediate value is not a record, or an optional reference on
/// the way (or the leaf itself) is absent. Whether that is fatal is up to the
/// caller.
pub fn resolve<'a>(root: &'a dyn Record, path: &str, scheme: &str) -> Option<Resolved<'a>> {
    let mut current = Value::Record(root);
    let mut names = Vec::new();

    for segment in path.split(PATH_SEPARATOR) {
        let record = match current {
            Value::Record(record) => record,
            _ => {
                tracing::trace!(path, segment, "path walks through a non-record value");
                return None;
            }
        };

        let name = if scheme.is_empty() {
            segment
        } else {
            record.alias(segment, scheme).unwrap_or(segment)
        };
        names.push(name.to_string());

        current = match record.field(segment) {
            Some(value) => value,
            None => {
                tracing::trace!(path, segment, record = record.type_name(), "unknown field");
                return None;
            }
        };
    }

    if current.is_absent() {
        return None;
    }

    Some(Resolved {
        value: current,
        path: names.join("."),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Described, RecordSchema};
    use std::sync::LazyLock;

    struct Address {
        city: String,
    }

    struct Profile {
        bio: Option<String>,
    }

    struct User {
        name: String,
        age: i64,
        address: Address,
        profile: Option<Profile>,
    }

    static ADDRESS: LazyLock<RecordSchema<Address>> = LazyLock::new(|| {
        RecordSchema::<Address>::new("Address")
            .field("City", |a| Value::from(&a.city))
            .alias("json", "City", "json_city,omitempty")
    });

    static PROFILE: LazyLock<RecordSchema<Profile>> = LazyLock::new(|| {
        RecordSchema::<Profile>::new("Profile")
            .field("Bio", |p| Value::from(p.bio.as_deref()))
    });

    static USER: LazyLock<RecordSchema<User>> = LazyLock::new(|| {
        RecordSchema::<User>::new("User")
            .field("Name", |u| Value::from(&u.name))
            .field("Age", |u| Value::from(u.age))
            .field("Address", |u| Value::record(&u.address))
            .field("Profile", |u| Value::optional_record(u.profile.as_ref()))
            .alias("json", "Address", "address")
            .alias("json", "Name", "-")
    });

    impl Described for Address {
        fn schema() -> &'static RecordSchema<Self> {
            &ADDRESS
        }
    }

    impl Described for Profile {
        fn schema() -> &'static RecordSchema<Self> {
            &PROFILE
        }
    }

    impl Described for User {
        fn schema() -> &'static RecordSchema<Self> {
            &USER
        }
    }

    fn user() -> User {
        User {
            name: "Ann".to_string(),
            age: 30,
            address: Address {
                city: "Kyoto".to_string(),
            },
            profile: None,
        }
    }

    #[test]
    fn test_resolve_top_level() {
        let user = user();
        let resolved = resolve(&user, "Age", "").unwrap();
        assert_eq!(resolved.value, Value::Int(30));
        assert_eq!(resolved.path, "Age");
    }

    #[test]
    fn test_resolve_nested() {
        let user = user();
        let resolved = resolve(&user, "Address.City", "").unwrap();
        assert_eq!(resolved.value, Value::Str("Kyoto"));
        assert_eq!(resolved.path, "Address.City");
    }

    #[test]
    fn test_resolve_with_scheme_renames_each_segment() {
        let user = user();
        let resolved = resolve(&user, "Address.City", "json").unwrap();
        assert_eq!(resolved.path, "address.json_city");
    }

    #[test]
    fn test_ignored_alias_keeps_original_name() {
        let user = user();
        let resolved = resolve(&user, "Name", "json").unwrap();
        assert_eq!(resolved.path, "Name");
    }

    #[test]
    fn test_unknown_field_is_unreachable() {
        let user = user();
        assert!(resolve(&user, "Nope", "").is_none());
        assert!(resolve(&user, "Address.Zip", "").is_none());
    }

    #[test]
    fn test_absent_optional_short_circuits() {
        let user = user();
        assert!(resolve(&user, "Profile.Bio", "").is_none());
        assert!(resolve(&user, "Profile", "").is_none());
    }

    #[test]
    fn test_absent_leaf_is_unreachable() {
        let mut user = user();
        user.profile = Some(Profile { bio: None });
        assert!(resolve(&user, "Profile.Bio", "").is_none());

        user.profile = Some(Profile {
            bio: Some("hi".to_string()),
        });
        assert_eq!(resolve(&user, "Profile.Bio", "").unwrap().value, Value::Str("hi"));
    }

    #[test]
    fn test_walking_through_scalar_is_unreachable() {
        let user = user();
        assert!(resolve(&user, "Name.Length", "").is_none());
    }
}
