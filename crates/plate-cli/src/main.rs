//! Plate CLI - offline rendering through the Dattorro plate reverb.

mod commands;
mod wav;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plate")]
#[command(author, version, about = "Dattorro plate reverb CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the reverb
    Process(commands::process::ProcessArgs),

    /// Render the reverb's impulse response to a WAV file
    Impulse(commands::impulse::ImpulseArgs),

    /// List factory and user presets, or show one
    Presets(commands::presets::PresetsArgs),

    /// List reverb parameters with ranges and defaults
    Params,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Impulse(args) => commands::impulse::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Params => commands::params::run(),
    }
}
