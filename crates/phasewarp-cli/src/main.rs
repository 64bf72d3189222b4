//! Phasewarp CLI - render, analyze and inspect the phasewarp synth voice.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "phasewarp")]
#[command(author, version, about = "Phasewarp synth voice CLI", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single note to a WAV file
    Render(commands::render::RenderArgs),

    /// Render a note through the spectrum analyzer and report its peaks
    Analyze(commands::analyze::AnalyzeArgs),

    /// List synth parameters with their ranges and values
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for --json output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Render(args) => commands::render::run(config, args),
        Commands::Analyze(args) => commands::analyze::run(config, args),
        Commands::Params(args) => commands::params::run(config, args),
    }
}
