//! FsmLens CLI - inspect PlayMaker state machines from the command line

pub mod commands;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "fsmlens")]
#[command(about = "FsmLens: PlayMaker state machine inspector", long_about = None)]
struct Cli {
    /// Log debug output (decode fallbacks, unresolved states)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the FsmLens CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    cli.command.execute()?;

    Ok(())
}
