//! CLI Module
//!
//! Command-line interface for the glasscut session engine.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Glasscut - procedural glass cutting ambience
#[derive(Parser, Debug)]
#[command(name = "glasscut")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interactive session in the terminal
    #[command(name = "play")]
    Play {
        /// Initial volume (0-100), overrides the configuration
        #[arg(long)]
        volume: Option<u32>,

        /// Seed the session RNG for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Start with the sound muted (volume 0)
        #[arg(short, long)]
        muted: bool,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Render a session to a WAV file
    #[command(name = "render")]
    Render {
        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,

        /// Session length in seconds
        #[arg(long, default_value_t = 30.0)]
        seconds: f32,

        /// Volume (0-100), overrides the configuration
        #[arg(long)]
        volume: Option<u32>,

        /// Seed for the session RNG
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
