// RUNTIME PREFERENCES (User Experience)

use super::compile_time::editor::MAX_NESTING_DEPTH;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Environment variable names read by the preference defaults
pub mod env_vars {
    pub const MAX_NESTING_DEPTH: &str = "FILTER_EDITOR_MAX_NESTING_DEPTH";
    pub const PRETTY_JSON: &str = "FILTER_EDITOR_PRETTY_JSON";
    pub const LOG_MUTATIONS: &str = "FILTER_EDITOR_LOG_MUTATIONS";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid preferences TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Preference '{name}' is {value}, allowed range is {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::system::CONFIGURATION_ERROR
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Deepest group nesting the constructor lets the user build (root = 1)
    pub max_nesting_depth: usize,

    /// Whether the raw-text tab receives pretty-printed JSON
    pub pretty_json: bool,

    /// Whether every structural mutation is logged at debug level
    pub log_mutations: bool,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            max_nesting_depth: env::var(env_vars::MAX_NESTING_DEPTH)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_NESTING_DEPTH)
                .clamp(1, MAX_NESTING_DEPTH),
            pretty_json: env::var(env_vars::PRETTY_JSON)
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            log_mutations: env::var(env_vars::LOG_MUTATIONS)
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
        }
    }
}

impl EditorPreferences {
    /// Load preferences from a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let preferences: Self = toml::from_str(content).map_err(|e| {
            let error = ConfigError::from(e);
            crate::log_error!(error.error_code(), "Editor preferences rejected", "reason" => &error);
            error
        })?;
        preferences.validate()?;
        Ok(preferences)
    }

    /// Check preferences against compile-time limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nesting_depth == 0 || self.max_nesting_depth > MAX_NESTING_DEPTH {
            return Err(ConfigError::OutOfRange {
                name: "max_nesting_depth",
                value: self.max_nesting_depth,
                min: 1,
                max: MAX_NESTING_DEPTH,
            });
        }
        Ok(())
    }
}

/// Accepts the usual spellings: true/false, 1/0, yes/no, on/off
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_bool_parsing() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(" no "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_toml_partial_document_keeps_defaults() {
        let preferences = EditorPreferences::from_toml_str("pretty_json = false\n").unwrap();
        assert!(!preferences.pretty_json);
        assert!(preferences.max_nesting_depth >= 1);
    }

    #[test]
    fn test_toml_rejects_out_of_range_depth() {
        let result = EditorPreferences::from_toml_str("max_nesting_depth = 0\n");
        assert_matches!(
            result,
            Err(ConfigError::OutOfRange {
                name: "max_nesting_depth",
                ..
            })
        );
    }

    #[test]
    fn test_toml_rejects_wrong_types() {
        let result = EditorPreferences::from_toml_str("pretty_json = \"sometimes\"\n");
        assert_matches!(result, Err(ConfigError::Toml(_)));
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(!env_vars::MAX_NESTING_DEPTH.is_empty());
        assert!(!env_vars::PRETTY_JSON.is_empty());
        assert!(!env_vars::LOG_MUTATIONS.is_empty());
    }
}
