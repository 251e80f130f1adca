//! Condition compiler configuration
//!
//! Variable naming and hierarchy expansion settings.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Deepest hierarchy closure the executor is asked to expand.
pub const MAX_HIERARCHY_DEPTH: u32 = 100;

/// Condition compiler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Prefix of fresh join variables (`v` gives `?v1`, `?v2`, ...)
    pub variable_prefix: String,
    /// Name of the root join variable
    pub result_variable: String,
    /// Suffix of variables holding a page's sort key (`?v1` gives `?v1sk`)
    pub sort_key_suffix: String,
    /// Subcategory levels to expand for category conditions; 0 disables
    /// hierarchy closure
    pub category_hierarchy_depth: u32,
    /// Subproperty levels to expand for property conditions; 0 disables
    /// hierarchy closure
    pub property_hierarchy_depth: u32,
    /// Log lenient comparator handling at warn level instead of debug
    pub warn_on_lenient_comparators: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            variable_prefix: "v".to_string(),
            result_variable: "result".to_string(),
            sort_key_suffix: "sk".to_string(),
            category_hierarchy_depth: 10,
            property_hierarchy_depth: 10,
            warn_on_lenient_comparators: false,
        }
    }
}

impl CompilerConfig {
    /// Check names and depths.
    ///
    /// The result variable must not look like a fresh variable
    /// (`<prefix><digits>`) or its sort variable
    /// (`<prefix><digits><suffix>`), or the two could collide.
    pub fn validate(&self) -> ConfigResult<()> {
        check_identifier("compiler.variable_prefix", &self.variable_prefix)?;
        check_identifier("compiler.result_variable", &self.result_variable)?;
        check_identifier("compiler.sort_key_suffix", &self.sort_key_suffix)?;

        let as_sort_variable = self.result_variable.strip_suffix(&self.sort_key_suffix);
        if self.is_fresh_variable(&self.result_variable)
            || as_sort_variable.is_some_and(|name| self.is_fresh_variable(name))
        {
            return Err(ConfigError::InvalidValue {
                field: "compiler.result_variable".to_string(),
                value: format!(
                    "'{}' collides with fresh variables prefixed '{}'",
                    self.result_variable, self.variable_prefix
                ),
            });
        }

        for (field, depth) in [
            ("compiler.category_hierarchy_depth", self.category_hierarchy_depth),
            ("compiler.property_hierarchy_depth", self.property_hierarchy_depth),
        ] {
            if depth > MAX_HIERARCHY_DEPTH {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: format!("{} exceeds maximum of {}", depth, MAX_HIERARCHY_DEPTH),
                });
            }
        }

        Ok(())
    }

    fn is_fresh_variable(&self, name: &str) -> bool {
        name.strip_prefix(&self.variable_prefix)
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    }
}

fn check_identifier(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: "must not be empty".to_string(),
        });
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: format!("'{}' may only contain ASCII letters, digits and '_'", value),
        });
    }
    Ok(())
}
