//! CLI command for rendering a state machine dump

use super::OutputFormat;
use crate::document::{DocumentBuilder, DocumentOptions, to_json, to_text};
use crate::naming::NoNames;
use crate::playmaker::StateMachine;
use anyhow::Context;
use std::path::Path;

pub fn execute(
    dump: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    no_actions: bool,
    no_variables: bool,
) -> anyhow::Result<()> {
    let fsm = StateMachine::from_json_file(dump)
        .with_context(|| format!("Failed to load state machine from {}", dump.display()))?;

    let options = DocumentOptions::new()
        .with_actions(!no_actions)
        .with_variables(!no_variables);
    // dumps carry no containers, so only names stored in the dump are shown
    let doc = DocumentBuilder::with_options(&NoNames, options).build(&fsm);

    let rendered = match format {
        OutputFormat::Text => to_text(&doc),
        OutputFormat::Json => to_json(&doc)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
