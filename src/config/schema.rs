//! Configuration schema types for `animatecss.toml`
//!
//! Defines the project configuration file and the runtime [`PluginConfig`]
//! resolved from its theme section.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::selector::SelectorRewriter;

/// Class-name prefix used when the theme does not set one
pub const DEFAULT_PREFIX: &str = "animatecss";

/// Theme path holding the class-name prefix
pub const PREFIX_THEME_PATH: &str = "animatecss.prefix";

/// File name searched for by the config loader
pub const CONFIG_FILE_NAME: &str = "animatecss.toml";

/// Location of the animate.css package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Package root (the directory holding `package.json` and `source/`).
    /// Discovered from `node_modules` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Generated stylesheet output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file; stdout when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Minify the generated CSS
    #[serde(default)]
    pub minify: bool,
}

/// Complete animatecss.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub package: PackageConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Theme values exposed to the plugin through dotted paths
    /// (`[theme.animatecss] prefix = "..."`)
    #[serde(default)]
    pub theme: toml::Table,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "theme.animatecss.prefix")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: '{}' {}", CONFIG_FILE_NAME, self.field, self.message)
    }
}

impl ProjectConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        match self.theme_value(PREFIX_THEME_PATH) {
            None | Some(toml::Value::String(_)) => {}
            Some(_) => errors.push(ConfigValidationError {
                field: format!("theme.{}", PREFIX_THEME_PATH),
                message: "must be a string".to_string(),
            }),
        }

        if let Some(toml::Value::String(prefix)) = self.theme_value(PREFIX_THEME_PATH) {
            if prefix.chars().any(char::is_whitespace) {
                errors.push(ConfigValidationError {
                    field: format!("theme.{}", PREFIX_THEME_PATH),
                    message: "must not contain whitespace".to_string(),
                });
            }
        }

        errors
    }

    /// Look up a theme value by dotted path (`"animatecss.prefix"`)
    pub fn theme_value(&self, path: &str) -> Option<&toml::Value> {
        lookup_path(&self.theme, path)
    }

    /// Set a theme value by dotted path, creating intermediate tables
    pub fn set_theme_value(&mut self, path: &str, value: toml::Value) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut table = &mut self.theme;
        for segment in segments {
            let entry = table
                .entry(segment.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            if !entry.is_table() {
                *entry = toml::Value::Table(toml::Table::new());
            }
            let toml::Value::Table(next) = entry else {
                unreachable!("entry was just made a table");
            };
            table = next;
        }
        table.insert(last.to_string(), value);
    }
}

/// Resolve a dotted path against a TOML table
pub fn lookup_path<'a>(table: &'a toml::Table, path: &str) -> Option<&'a toml::Value> {
    let mut segments = path.split('.');
    let mut value = table.get(segments.next()?)?;
    for segment in segments {
        value = value.as_table()?.get(segment)?;
    }
    Some(value)
}

/// Plugin settings, resolved once before any file is read and passed to
/// every registration phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Class-name prefix (`animatecss` → `.animatecss`, `.animatecss-bounce`)
    pub prefix: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self { prefix: DEFAULT_PREFIX.to_string() }
    }
}

impl PluginConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Resolve the prefix through a host theme lookup. A missing or empty
    /// value falls back to [`DEFAULT_PREFIX`].
    pub fn from_theme(theme: impl Fn(&str) -> Option<String>) -> Self {
        match theme(PREFIX_THEME_PATH) {
            Some(prefix) if !prefix.is_empty() => Self { prefix },
            _ => Self::default(),
        }
    }

    /// Selector rewriter for this prefix
    pub fn rewriter(&self, use_prefix: bool) -> SelectorRewriter {
        SelectorRewriter::new(self.prefix.clone(), use_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> ProjectConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_empty_config() {
        let config = parse("");
        assert_eq!(config, ProjectConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
[package]
path = "vendor/animate.css"

[output]
path = "dist/animate.css"
minify = true

[theme.animatecss]
prefix = "custom-animation"
"#,
        );

        assert_eq!(config.package.path, Some(PathBuf::from("vendor/animate.css")));
        assert_eq!(config.output.path, Some(PathBuf::from("dist/animate.css")));
        assert!(config.output.minify);
        assert_eq!(
            config.theme_value(PREFIX_THEME_PATH).and_then(|v| v.as_str()),
            Some("custom-animation")
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_non_string_prefix_invalid() {
        let config = parse("[theme.animatecss]\nprefix = 3\n");
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "theme.animatecss.prefix");
        assert!(errors[0].to_string().contains("must be a string"));
    }

    #[test]
    fn test_whitespace_prefix_invalid() {
        let config = parse("[theme.animatecss]\nprefix = \"a b\"\n");
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_lookup_path() {
        let config = parse("[theme.a.b]\nc = \"d\"\n");
        assert_eq!(config.theme_value("a.b.c").and_then(|v| v.as_str()), Some("d"));
        assert!(config.theme_value("a.b").unwrap().is_table());
        assert!(config.theme_value("a.x.c").is_none());
        assert!(config.theme_value("a.b.c.d").is_none());
    }

    #[test]
    fn test_set_theme_value() {
        let mut config = ProjectConfig::default();
        config.set_theme_value(PREFIX_THEME_PATH, toml::Value::String("fx".to_string()));
        assert_eq!(config.theme_value(PREFIX_THEME_PATH).and_then(|v| v.as_str()), Some("fx"));

        config.set_theme_value(PREFIX_THEME_PATH, toml::Value::String("gx".to_string()));
        assert_eq!(config.theme_value(PREFIX_THEME_PATH).and_then(|v| v.as_str()), Some("gx"));
    }

    #[test]
    fn test_plugin_config_from_theme() {
        assert_eq!(PluginConfig::from_theme(|_| None).prefix, DEFAULT_PREFIX);
        assert_eq!(PluginConfig::from_theme(|_| Some(String::new())).prefix, DEFAULT_PREFIX);

        let config = PluginConfig::from_theme(|path| {
            assert_eq!(path, PREFIX_THEME_PATH);
            Some("custom-animation".to_string())
        });
        assert_eq!(config.prefix, "custom-animation");
    }
}
