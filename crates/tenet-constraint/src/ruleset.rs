//! Rule sets loaded from TOML

use crate::evaluator::{Validator, ValidatorBuilder};
use crate::template::TemplateMap;
use crate::types::Rule;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tenet_core::{Literal, Result, TenetError};

/// On-disk layout of a rule file
#[derive(Debug, Default, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rule: Vec<Rule>,
    #[serde(default)]
    pub templates: TemplateMap,
    #[serde(default)]
    pub inclusion: BTreeMap<String, Vec<Literal>>,
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
}

/// Registrations a rule file asks for, applied to a [`ValidatorBuilder`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorConfig {
    pub templates: TemplateMap,
    pub inclusion: BTreeMap<String, Vec<Literal>>,
    pub patterns: BTreeMap<String, String>,
}

impl ValidatorConfig {
    /// Later entries replace earlier ones with the same key
    fn merge(&mut self, file: RuleFile) {
        self.templates.extend(file.templates);
        self.inclusion.extend(file.inclusion);
        self.patterns.extend(file.patterns);
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.inclusion.is_empty() && self.patterns.is_empty()
    }

    /// Register patterns, inclusion lists and the custom template table
    pub fn apply(&self, builder: &mut ValidatorBuilder) -> Result<()> {
        for (name, pattern) in &self.patterns {
            builder.register_pattern(name, pattern)?;
        }
        for (param, values) in &self.inclusion {
            builder.register_inclusion(param, values.iter().cloned())?;
        }
        if !self.templates.is_empty() {
            builder.register_templates(self.templates.clone())?;
        }
        Ok(())
    }
}

/// Ordered rules plus the validator settings that came with them
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    config: ValidatorConfig,
}

impl RuleSet {
    /// Create a new empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `rules/*.toml` file under `path`, in file name order
    pub fn load_from_directory<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut set = Self::new();
        let rules_path = path.as_ref().join("rules");

        if rules_path.exists() {
            let mut files: Vec<PathBuf> = Vec::new();
            for entry in fs::read_dir(&rules_path)? {
                let file_path = entry?.path();
                if file_path.extension().map(|e| e == "toml").unwrap_or(false) {
                    files.push(file_path);
                }
            }
            files.sort();
            for file in files {
                set.load_file(&file)?;
            }
        }

        tracing::debug!(rules = set.len(), path = %rules_path.display(), "loaded rule directory");
        Ok(set)
    }

    /// Load rules from a TOML file
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_string(&content).map_err(|e| match e {
            TenetError::RuleLoadError(reason) => {
                TenetError::RuleLoadError(format!("{}: {}", path.as_ref().display(), reason))
            }
            other => other,
        })
    }

    /// Load rules from a TOML string
    pub fn load_string(&mut self, content: &str) -> Result<()> {
        let mut file: RuleFile = toml::from_str(content).map_err(|e| {
            TenetError::RuleLoadError(format!("Failed to parse rule TOML: {}", e))
        })?;

        for rule in &file.rule {
            if rule.field.is_empty() {
                return Err(TenetError::RuleLoadError(
                    "rule field can not be empty".to_string(),
                ));
            }
        }

        self.rules.append(&mut file.rule);
        self.config.merge(file);
        Ok(())
    }

    /// Append a rule
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Register this set's settings on a builder
    pub fn configure(&self, builder: &mut ValidatorBuilder) -> Result<()> {
        self.config.apply(builder)
    }

    /// Build a validator with the built-ins plus this set's settings
    pub fn validator(&self) -> Result<Validator> {
        let mut builder = Validator::builder();
        self.configure(&mut builder)?;
        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
