//! Placeholder interpolation for config files
//!
//! Handles `{{ env.NAME }}` and `{{ vars.name }}` placeholders so secrets and
//! deployment specifics stay out of the YAML file.

use crate::error::{Error, Result};
use crate::types::StringMap;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ scope.name }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Environment variables (`env.*`)
    pub env: StringMap,
    /// Caller-supplied variables (`vars.*`)
    pub vars: StringMap,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context populated from the process environment
    pub fn from_env() -> Self {
        Self {
            env: std::env::vars().collect(),
            vars: StringMap::new(),
        }
    }

    /// Set an environment entry
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set a variable
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Look up a value by path (e.g., "env.LUQMAH_ENDPOINT")
    pub fn get(&self, path: &str) -> Option<&str> {
        let (scope, name) = path.split_once('.')?;
        match scope {
            "env" => self.env.get(name),
            "vars" => self.vars.get(name),
            _ => None,
        }
        .map(String::as_str)
    }
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut result = template.to_string();
    let mut errors = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let full_match = &cap[0];
        let var_path = &cap[1];

        match ctx.get(var_path) {
            Some(value) => {
                result = result.replace(full_match, value);
            }
            None => {
                errors.push(var_path.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.set_env("LUQMAH_ENDPOINT", "https://cloud.appwrite.io/v1")
            .set_env("LUQMAH_PROJECT_ID", "proj-1")
            .set_var("table", "restaurants");
        ctx
    }

    #[test]
    fn test_env_substitution() {
        let result = render("endpoint: {{ env.LUQMAH_ENDPOINT }}", &ctx()).unwrap();
        assert_eq!(result, "endpoint: https://cloud.appwrite.io/v1");
    }

    #[test]
    fn test_multiple_substitutions() {
        let result = render(
            "{{ env.LUQMAH_PROJECT_ID }}/{{ vars.table }}",
            &ctx(),
        )
        .unwrap();
        assert_eq!(result, "proj-1/restaurants");
    }

    #[test]
    fn test_undefined_variable() {
        let result = render("{{ env.MISSING }} {{ other.x }}", &ctx());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("env.MISSING"));
        assert!(err.contains("other.x"));
    }

    #[test]
    fn test_whitespace_in_template() {
        let ctx = ctx();
        assert_eq!(render("{{vars.table}}", &ctx).unwrap(), "restaurants");
        assert_eq!(render("{{  vars.table  }}", &ctx).unwrap(), "restaurants");
    }
}
