use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod decode;
pub mod detect;
pub mod execute;
pub mod render;

/// Output format for rendered documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented outline
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect whether a file is a bundle or a serialized assets file
    Detect {
        /// File to inspect
        file: PathBuf,
    },

    /// Render a state machine dump as a document
    Render {
        /// State machine dump (JSON)
        dump: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave out action class markers and parameters
        #[arg(long)]
        no_actions: bool,

        /// Leave out the variable list
        #[arg(long)]
        no_variables: bool,
    },

    /// Print the decoded action parameters of one state
    Decode {
        /// State machine dump (JSON)
        dump: PathBuf,

        /// Name of the state
        #[arg(short, long)]
        state: String,
    },
}
