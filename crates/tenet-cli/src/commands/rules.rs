//! Rule listing command

use anyhow::{Context, Result};
use std::path::Path;
use tenet_constraint::RuleSet;

/// Load a single rule file, or every `rules/*.toml` under a directory
pub fn load_rules(path: &str) -> Result<RuleSet> {
    if Path::new(path).is_dir() {
        return RuleSet::load_from_directory(path)
            .with_context(|| format!("failed to load rules under {}", path));
    }

    let mut set = RuleSet::new();
    set.load_file(path)
        .with_context(|| format!("failed to load rule file {}", path))?;
    Ok(set)
}

pub fn run(path: &str) -> Result<()> {
    let set = load_rules(path)?;
    print!("{}", describe(&set));
    Ok(())
}

fn describe(set: &RuleSet) -> String {
    let mut out = String::new();
    if set.is_empty() {
        out.push_str("No rules found.\n");
    } else {
        out.push_str(&format!("{} rule(s):\n", set.len()));
        for rule in set.rules() {
            out.push_str(&format!("  {}: {}", rule.field, rule.constraints));
            if !rule.code.is_empty() {
                out.push_str(&format!(" [code: {}]", rule.code));
            }
            if !rule.message.is_empty() {
                out.push_str(&format!(" \"{}\"", rule.message));
            }
            out.push('\n');
        }
    }

    let config = set.config();
    let mut names: Vec<&String> = config.templates.keys().collect();
    names.sort();
    for name in names {
        out.push_str(&format!("  template {} = \"{}\"\n", name, config.templates[name]));
    }
    for (param, values) in &config.inclusion {
        let values: Vec<String> = values.iter().map(ToString::to_string).collect();
        out.push_str(&format!("  inclusion {} = [{}]\n", param, values.join(", ")));
    }
    for (name, pattern) in &config.patterns {
        out.push_str(&format!("  pattern {} = {}\n", name, pattern));
    }
    out
}
