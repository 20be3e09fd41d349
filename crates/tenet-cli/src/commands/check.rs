//! Record validation command

use super::rules::load_rules;
use anyhow::{Context, Result};
use std::fs;
use tenet_constraint::{MessageMap, Validator, Violations, WireError};

pub struct CheckArgs {
    pub record: String,
    pub rules: String,
    pub scheme: Option<String>,
    pub format: String,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let content = fs::read_to_string(&args.record)
        .with_context(|| format!("failed to read record {}", args.record))?;
    let record: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", args.record))?;

    let set = load_rules(&args.rules)?;
    if set.is_empty() {
        println!("No rules found in {}", args.rules);
        return Ok(());
    }
    let validator = set.validator().context("invalid validator settings")?;

    let scheme = args.scheme.as_deref().unwrap_or("");
    let violations = validator.validate_with_scheme(&record, set.rules(), scheme)?;
    tracing::info!(
        record = %args.record,
        rules = set.len(),
        violations = violations.as_ref().map(Violations::len).unwrap_or(0),
        "checked record"
    );

    let output = match args.format.as_str() {
        "json" => format_json(&validator, violations.as_ref())?,
        "wire" => format_wire(&validator, violations.as_ref())?,
        _ => format_text(&validator, violations.as_ref())?,
    };
    print!("{}", output);

    if violations.is_some() {
        std::process::exit(1);
    }

    Ok(())
}

fn format_text(validator: &Validator, violations: Option<&Violations>) -> Result<String> {
    let Some(violations) = violations else {
        return Ok("All rules passed.\n".to_string());
    };

    let mut out = format!("{} violation(s):\n", violations.len());
    for violation in violations {
        let rendered = tenet_constraint::render(violation, validator.templates())?;
        out.push_str(&format!("  {}: {}", violation.field, rendered));
        if !violation.code.is_empty() {
            out.push_str(&format!(" [code: {}]", violation.code));
        }
        out.push('\n');
    }
    Ok(out)
}

fn format_json(validator: &Validator, violations: Option<&Violations>) -> Result<String> {
    let messages = match violations {
        Some(violations) => violations.to_message_map(validator.templates())?,
        None => MessageMap::new(),
    };
    Ok(format!("{}\n", serde_json::to_string_pretty(&messages)?))
}

fn format_wire(validator: &Validator, violations: Option<&Violations>) -> Result<String> {
    let wire = WireError::from_violations(violations, validator.templates())?.normalized();
    Ok(format!("{}\n", serde_json::to_string_pretty(&wire)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenet_constraint::Rule;

    fn violations(validator: &Validator) -> Option<Violations> {
        let record = json!({"Name": "", "Age": 15});
        let rules = vec![
            Rule::new("Name", "required").with_code("E_NAME"),
            Rule::new("Age", "min=18"),
        ];
        validator.validate(&record, &rules).unwrap()
    }

    #[test]
    fn test_text_output() {
        let validator = Validator::new();
        let found = violations(&validator);
        let text = format_text(&validator, found.as_ref()).unwrap();
        assert_eq!(
            text,
            "2 violation(s):\n  Name: can not be blank [code: E_NAME]\n  Age: is too small, minimum is 18\n"
        );
        assert_eq!(format_text(&validator, None).unwrap(), "All rules passed.\n");
    }

    #[test]
    fn test_json_output() {
        let validator = Validator::new();
        let found = violations(&validator);
        let text = format_json(&validator, found.as_ref()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({"Name": ["can not be blank"], "Age": ["is too small, minimum is 18"]})
        );
    }

    #[test]
    fn test_wire_output_promotes_single_violation() {
        let validator = Validator::new();
        let record = json!({"Name": ""});
        let found = validator
            .validate(&record, &[Rule::new("Name", "required").with_code("E_NAME")])
            .unwrap();
        let text = format_wire(&validator, found.as_ref()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["code"], "E_NAME");
        assert_eq!(parsed["hmsg"], "can not be blank");
        assert_eq!(parsed["field_violations"][0]["field"], "Name");
    }
}
