//! Constraint spec parsing
//!
//! A constraint spec is a comma-separated list of tokens such as
//! `required,lte=20`. There is no escaping, so neither field paths nor
//! constraint names may contain `,` or `=`.

pub const TOKEN_SEPARATOR: char = ',';
pub const PARAM_SEPARATOR: char = '=';

/// Split a spec into its raw tokens. Always yields at least one token.
pub fn split(spec: &str) -> Vec<&str> {
    spec.split(TOKEN_SEPARATOR).collect()
}

/// The constraint name: text before the first `=`
pub fn name_of(token: &str) -> &str {
    token
        .split_once(PARAM_SEPARATOR)
        .map(|(name, _)| name)
        .unwrap_or(token)
}

/// The parameter: text after the first `=`, or the whole token without one
pub fn param_of(token: &str) -> &str {
    token
        .split_once(PARAM_SEPARATOR)
        .map(|(_, param)| param)
        .unwrap_or(token)
}

/// One named, optionally parameterized check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintToken {
    pub name: String,
    /// Empty when the token carries no `=`
    pub param: String,
}

impl ConstraintToken {
    pub fn parse(token: &str) -> Self {
        match token.split_once(PARAM_SEPARATOR) {
            Some((name, param)) => Self {
                name: name.to_string(),
                param: param.to_string(),
            },
            None => Self {
                name: token.to_string(),
                param: String::new(),
            },
        }
    }
}
