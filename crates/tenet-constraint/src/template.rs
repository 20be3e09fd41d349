//! Message templating
//!
//! Templates substitute two variables, `{{Tag}}` (the constraint name) and
//! `{{Param}}` (its parameter). Whitespace inside the braces and a leading
//! `.` are tolerated, so `{{ .Param }}` works too. Lookup order is the custom
//! table, then the default table, then a generic fallback.

use crate::report::Violation;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;
use tenet_core::{Result, TenetError};

/// Constraint name to template text
pub type TemplateMap = HashMap<String, String>;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

static DEFAULTS: LazyLock<HashMap<&'static str, Template>> = LazyLock::new(|| {
    [
        ("required", "can not be blank"),
        ("lte", "is too long, maximum length is {{Param}}"),
        ("gte", "is too short, minimum length is {{Param}}"),
        ("max", "is too large, maximum is {{Param}}"),
        ("min", "is too small, minimum is {{Param}}"),
        ("zipcode_jp", "invalid zipcode format, format is 123-1234"),
        ("inclusion", "invalid {{Param}} value"),
        ("simple_email", "invalid email format"),
    ]
    .into_iter()
    .map(|(name, text)| (name, Template::parse(text).expect("valid default template")))
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Tag,
    Param,
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text, rejecting unclosed actions and unknown variables
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after = &rest[start + OPEN.len()..];
            let end = after
                .find(CLOSE)
                .ok_or_else(|| TenetError::template(text, "unclosed action"))?;
            let variable = after[..end].trim();
            let variable = variable.strip_prefix('.').unwrap_or(variable);
            match variable {
                "Tag" => segments.push(Segment::Tag),
                "Param" => segments.push(Segment::Param),
                "" => return Err(TenetError::template(text, "missing value for action")),
                other => {
                    return Err(TenetError::template(
                        text,
                        format!("unknown variable '{}'", other),
                    ))
                }
            }
            rest = &after[end + CLOSE.len()..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn execute(&self, tag: &str, param: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Tag => out.push_str(tag),
                Segment::Param => out.push_str(param),
            }
        }
        out
    }
}

/// Message used when neither table has an entry for the constraint
pub fn fallback_message(tag: &str, param: &str) -> String {
    if param.is_empty() {
        format!("validation failed with {}", tag)
    } else {
        format!("validation failed with {}={}", tag, param)
    }
}

/// Render one violation into end-user text
pub fn render(violation: &Violation, custom: Option<&TemplateMap>) -> Result<String> {
    let tag = violation.constraint.as_str();
    let param = violation.param.as_str();

    if let Some(text) = custom.and_then(|table| table.get(tag)).filter(|t| !t.is_empty()) {
        return Ok(Template::parse(text)?.execute(tag, param));
    }
    if let Some(template) = DEFAULTS.get(tag) {
        return Ok(template.execute(tag, param));
    }
    Ok(fallback_message(tag, param))
}

/// Validate every entry of a custom table before it is accepted.
///
/// Parsing is the only step that can fail; substitution is infallible once a
/// template parses.
pub fn check_templates(table: &TemplateMap) -> Result<()> {
    for (tag, text) in table {
        if tag.is_empty() {
            return Err(TenetError::template(
                text,
                "tag of the template map can not be empty",
            ));
        }
        Template::parse(text)?;
    }
    Ok(())
}

/// Rendered messages grouped by field path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageMap(BTreeMap<String, Vec<String>>);

impl MessageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_default().push(message);
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// `Name:["can not be blank"] Age:["is too small, minimum is 18"]`
impl fmt::Display for MessageMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(field)?;
            f.write_str(":")?;
            if !messages.is_empty() {
                write!(f, "[\"{}\"]", messages.join("\", \""))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for MessageMap {}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(constraint: &str, param: &str) -> Violation {
        Violation {
            field: "Field".to_string(),
            constraint: constraint.to_string(),
            param: param.to_string(),
            code: String::new(),
            message: String::new(),
            cause: None,
        }
    }

    fn table(entries: &[(&str, &str)]) -> TemplateMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(render(&violation("required", ""), None).unwrap(), "can not be blank");
        assert_eq!(
            render(&violation("max", "100"), None).unwrap(),
            "is too large, maximum is 100"
        );
        assert_eq!(
            render(&violation("inclusion", "gender"), None).unwrap(),
            "invalid gender value"
        );
    }

    #[test]
    fn test_every_default_renders() {
        for name in DEFAULTS.keys() {
            assert!(render(&violation(name, "1"), None).is_ok());
        }
    }

    #[test]
    fn test_fallback() {
        assert_eq!(
            render(&violation("eqfield", ""), None).unwrap(),
            "validation failed with eqfield"
        );
        assert_eq!(
            render(&violation("len", "3"), None).unwrap(),
            "validation failed with len=3"
        );
    }

    #[test]
    fn test_custom_overrides_default() {
        let custom = table(&[("required", "{{Tag}} is missing"), ("min", "")]);
        assert_eq!(
            render(&violation("required", ""), Some(&custom)).unwrap(),
            "required is missing"
        );
        // Empty custom entries fall through to the default table.
        assert_eq!(
            render(&violation("min", "18"), Some(&custom)).unwrap(),
            "is too small, minimum is 18"
        );
    }

    #[test]
    fn test_whitespace_and_dot_are_tolerated() {
        let template = Template::parse("{{ .Tag }}={{Param }}").unwrap();
        assert_eq!(template.execute("max", "3"), "max=3");
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(
            Template::parse("is {{Param"),
            Err(TenetError::Template { .. })
        ));
        assert!(matches!(
            Template::parse("is {{Value}}"),
            Err(TenetError::Template { .. })
        ));
        assert!(matches!(
            Template::parse("is {{}}"),
            Err(TenetError::Template { .. })
        ));
    }

    #[test]
    fn test_render_fails_on_bad_custom_entry() {
        let custom = table(&[("required", "{{Oops}}")]);
        assert!(render(&violation("required", ""), Some(&custom)).is_err());
    }

    #[test]
    fn test_check_templates() {
        assert!(check_templates(&table(&[("required", "{{Tag}} {{Param}}")])).is_ok());
        assert!(check_templates(&table(&[("", "text")])).is_err());
        assert!(check_templates(&table(&[("min", "{{Min}}")])).is_err());
    }

    #[test]
    fn test_message_map_display() {
        let mut map = MessageMap::new();
        map.push("Name", "can not be blank".to_string());
        map.push("Name", "is too long".to_string());
        map.push("Age", "is too small".to_string());
        assert_eq!(
            map.to_string(),
            r#"Age:["is too small"] Name:["can not be blank", "is too long"]"#
        );
        assert_eq!(MessageMap::new().to_string(), "");
    }

    #[test]
    fn test_message_map_serializes_as_object() {
        let mut map = MessageMap::new();
        map.push("Name", "can not be blank".to_string());
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::json!({"Name": ["can not be blank"]})
        );
    }
}
