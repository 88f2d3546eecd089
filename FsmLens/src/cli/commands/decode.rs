//! CLI command for dumping decoded action parameters

use crate::playmaker::{ActionDecoder, StateMachine, trim_class_name};
use anyhow::Context;
use std::path::Path;

pub fn execute(dump: &Path, state_name: &str) -> anyhow::Result<()> {
    let fsm = StateMachine::from_json_file(dump)
        .with_context(|| format!("Failed to load state machine from {}", dump.display()))?;
    let state = fsm
        .state(state_name)
        .with_context(|| format!("No state named '{state_name}'"))?;

    let data = &state.action_data;
    let decoder = ActionDecoder::new(data, fsm.data_version);
    for index in 0..data.action_count() {
        let name = trim_class_name(data.action_name(index).unwrap_or_default());
        let enabled = if data.action_enabled(index) { "" } else { " (disabled)" };
        println!("{name}{enabled}");

        for param in decoder.decode_action(index)? {
            let indent = "  ".repeat(usize::from(param.depth) + 1);
            let binding = match param.value.variable_name() {
                "" => String::new(),
                name => format!(" [{name}]"),
            };
            println!("{indent}{}: {}{binding}", param.name, param.value);
        }
    }
    Ok(())
}
