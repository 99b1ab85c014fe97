//! Glasscut CLI - Glass Cutting Ambience
//!
//! Command-line interface for the glasscut session engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use glasscut::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Glasscut v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd)?,
        // Bare invocation goes straight to the interactive session
        None => commands::play(None, None, false, None)?,
    }

    Ok(())
}

fn handle_command(cmd: Commands) -> glasscut::Result<()> {
    match cmd {
        Commands::Play {
            volume,
            seed,
            muted,
            config,
        } => commands::play(volume, seed, muted, config.as_deref()),
        Commands::Render {
            output,
            seconds,
            volume,
            seed,
            sample_rate,
            config,
        } => commands::render(&output, seconds, volume, seed, sample_rate, config.as_deref()),
    }
}
