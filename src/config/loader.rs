//! Configuration loading and discovery for `animatecss.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{ProjectConfig, CONFIG_FILE_NAME, PREFIX_THEME_PATH};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse animatecss.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the animate.css package root
    pub package: Option<PathBuf>,
    /// Override the output file
    pub out: Option<PathBuf>,
    /// Force minified output
    pub minify: Option<bool>,
    /// Override `theme.animatecss.prefix`
    pub prefix: Option<String>,
}

/// Find animatecss.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if an animatecss.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find animatecss.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an animatecss.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate the config file. If no config file is found,
/// returns the default configuration.
///
/// # Example
/// ```ignore
/// // Load from discovered config
/// let config = load_config(None)?;
///
/// // Load from specific path
/// let config = load_config(Some(Path::new("site/animatecss.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<ProjectConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
///
/// Relative paths inside the file are resolved against the file's directory.
fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: ProjectConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(base) = path.parent() {
        resolve_relative(&mut config.package.path, base);
        resolve_relative(&mut config.output.path, base);
    }

    Ok(config)
}

fn resolve_relative(path: &mut Option<PathBuf>, base: &Path) {
    if let Some(p) = path {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    }
}

/// Configuration used when no animatecss.toml is found
pub fn default_config() -> ProjectConfig {
    ProjectConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut ProjectConfig, overrides: &CliOverrides) {
    if let Some(ref package) = overrides.package {
        config.package.path = Some(package.clone());
    }

    if let Some(ref out) = overrides.out {
        config.output.path = Some(out.clone());
    }

    if let Some(minify) = overrides.minify {
        config.output.minify = minify;
    }

    if let Some(ref prefix) = overrides.prefix {
        config.set_theme_value(PREFIX_THEME_PATH, toml::Value::String(prefix.clone()));
    }
}
