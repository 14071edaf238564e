//! Build command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{open_session, PluginArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::CliOverrides;
use crate::error::PluginError;
use crate::output::{render_css, write_css};

/// Run the build command
pub fn run_build(
    args: &PluginArgs,
    classes: &[String],
    all: bool,
    output: Option<&Path>,
    minify: bool,
) -> ExitCode {
    if classes.is_empty() && !all {
        eprintln!("Error: no classes given (pass class names or --all)");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let overrides = CliOverrides {
        out: output.map(Path::to_path_buf),
        minify: minify.then_some(true),
        ..Default::default()
    };

    match build(args, classes, all, overrides) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn build(
    args: &PluginArgs,
    classes: &[String],
    all: bool,
    overrides: CliOverrides,
) -> Result<(), PluginError> {
    let session = open_session(args, overrides)?;

    let candidates = if all { session.registry.candidates()? } else { classes.to_vec() };
    tracing::debug!(candidates = candidates.len(), prefix = %session.plugin_config.prefix, "generating css");

    let sheet = session.registry.generate(&candidates)?;
    let css = render_css(&sheet, session.config.output.minify)?;

    match &session.config.output.path {
        Some(path) => {
            write_css(&css, path)?;
            tracing::info!(path = %path.display(), bytes = css.len(), "wrote stylesheet");
        }
        None => print!("{}", css),
    }
    Ok(())
}
