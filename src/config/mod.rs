//! Configuration for the animate.css plugin
//!
//! Provides the `animatecss.toml` project file types, their loader, and the
//! runtime [`PluginConfig`] resolved from theme values.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config, find_config, find_config_from, load_config, merge_cli_overrides, CliOverrides,
    ConfigError,
};
pub use schema::*;
