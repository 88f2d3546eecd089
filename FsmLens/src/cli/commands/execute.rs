//! Command execution implementations

use super::{Commands, decode, detect, render};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Detect { file } => detect::execute(file),
            Commands::Render {
                dump,
                format,
                output,
                no_actions,
                no_variables,
            } => render::execute(dump, *format, output.as_deref(), *no_actions, *no_variables),
            Commands::Decode { dump, state } => decode::execute(dump, state),
        }
    }
}
