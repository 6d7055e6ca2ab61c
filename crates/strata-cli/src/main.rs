//! Strata CLI - render scripted sessions of the strata synthesizer to WAV.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about = "Strata layered synthesizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a session file to WAV
    Render(commands::render::RenderArgs),

    /// Validate a session file
    Check(commands::check::CheckArgs),

    /// Write a starter session file
    Init(commands::init::InitArgs),

    /// List the control actions
    Actions(commands::actions::ActionsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so listings on stdout stay pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Init(args) => commands::init::run(args),
        Commands::Actions(args) => commands::actions::run(args),
    }
}
