//! Error types for plugin registration and output generation

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::stylesheet::CssError;

/// Error raised while loading animate.css sources or generating output.
///
/// Every variant aborts the registration that produced it; nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PluginError {
    /// A source file or directory could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A source file is not valid CSS
    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: CssError,
    },
    /// A rule selector could not be tokenized
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
    /// Project configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No animate.css package was found above the start directory
    #[error("animate.css package not found from '{}' (looked for node_modules/animate.css)", .0.display())]
    PackageNotFound(PathBuf),
    /// lightningcss rejected the generated stylesheet
    #[error("Failed to minify stylesheet: {0}")]
    Minify(String),
    /// The animation table could not be serialized
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PluginError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PluginError::Io { path: path.into(), source }
    }
}

impl<T: std::fmt::Display> From<lightningcss::error::Error<T>> for PluginError {
    fn from(e: lightningcss::error::Error<T>) -> Self {
        PluginError::Minify(e.to_string())
    }
}
