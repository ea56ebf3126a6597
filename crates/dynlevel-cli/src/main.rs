//! Dynlevel CLI - block-wise loudness leveling for stereo WAV files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dynlevel")]
#[command(author, version, about = "Dynamic loudness leveler for stereo audio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Level a WAV file block by block toward a target loudness
    Level(commands::level::LevelArgs),

    /// Measure integrated and per-block loudness of a WAV file
    Measure(commands::measure::MeasureArgs),

    /// List the built-in leveling profiles
    Profiles,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match &cli.command {
        Commands::Level(args) if args.quiet => "warn",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Level(args) => commands::level::run(args),
        Commands::Measure(args) => commands::measure::run(args),
        Commands::Profiles => commands::profiles::run(),
    }
}
