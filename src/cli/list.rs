//! List command implementation

use std::process::ExitCode;

use indexmap::IndexMap;

use super::{open_session, PluginArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::config::CliOverrides;
use crate::declarations::DeclarationBlock;
use crate::error::PluginError;

/// Run the list command
pub fn run_list(args: &PluginArgs, json: bool) -> ExitCode {
    match list(args, json) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn list(args: &PluginArgs, json: bool) -> Result<(), PluginError> {
    let session = open_session(args, CliOverrides::default())?;

    if json {
        let table: IndexMap<&str, &DeclarationBlock> = session
            .registry
            .families()
            .iter()
            .flat_map(|family| family.values.iter().map(|(name, rules)| (name.as_str(), rules)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        for candidate in session.registry.candidates()? {
            println!("{}", candidate);
        }
    }
    Ok(())
}
