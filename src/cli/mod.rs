//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;
mod list;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, PluginConfig, ProjectConfig};
use crate::error::PluginError;
use crate::host::UtilityRegistry;
use crate::plugin::AnimateCssPlugin;
use crate::source::AnimateSource;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// animatecss - animate.css utilities for utility-class CSS
#[derive(Parser)]
#[command(name = "animatecss")]
#[command(about = "Generate utility CSS from the animate.css sources")]
#[command(version)]
pub struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that registers the plugin
#[derive(Args, Debug, Clone, Default)]
pub struct PluginArgs {
    /// Path to animatecss.toml (default: search upward from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// animate.css package root (default: node_modules/animate.css, searched upward)
    #[arg(long)]
    pub package: Option<PathBuf>,

    /// Class-name prefix (overrides theme.animatecss.prefix)
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate CSS for the given utility classes
    Build {
        #[command(flatten)]
        plugin: PluginArgs,

        /// Utility classes to generate, e.g. `animatecss animatecss-bounce`
        classes: Vec<String>,

        /// Generate every known utility class
        #[arg(long, conflicts_with = "classes")]
        all: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minify the generated CSS
        #[arg(long)]
        minify: bool,
    },
    /// List generated utility classes or the animation table
    List {
        #[command(flatten)]
        plugin: PluginArgs,

        /// Print the animation lookup table as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A registry with the plugin registered into it
pub(crate) struct Session {
    pub config: ProjectConfig,
    pub plugin_config: PluginConfig,
    pub registry: UtilityRegistry,
}

/// Load configuration, locate animate.css and register the plugin
pub(crate) fn open_session(
    args: &PluginArgs,
    overrides: CliOverrides,
) -> Result<Session, PluginError> {
    let mut config = load_config(args.config.as_deref())?;
    let overrides = CliOverrides {
        package: args.package.clone(),
        prefix: args.prefix.clone(),
        ..overrides
    };
    merge_cli_overrides(&mut config, &overrides);

    let source = match &config.package.path {
        Some(root) => AnimateSource::new(root),
        None => {
            let cwd = std::env::current_dir().map_err(|e| PluginError::io(Path::new("."), e))?;
            AnimateSource::discover(&cwd)?
        }
    };
    tracing::debug!(root = %source.root().display(), "using animate.css package");

    let mut registry = UtilityRegistry::from_config(&config);
    let plugin_config = AnimateCssPlugin::new(source).register(&mut registry)?;

    Ok(Session { config, plugin_config, registry })
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_ARGS)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build { plugin, classes, all, output, minify } => {
            build::run_build(&plugin, &classes, all, output.as_deref(), minify)
        }
        Commands::List { plugin, json } => list::run_list(&plugin, json),
    }
}
