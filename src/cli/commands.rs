//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;
use std::sync::Arc;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::console;
use crate::error::{GlasscutError, Result};
use crate::render::render_to_wav;
use crate::scheduler::ThreadScheduler;
use crate::session::SessionController;

/// Run the interactive terminal session.
pub fn play(
    volume: Option<u32>,
    seed: Option<u64>,
    muted: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(volume) = volume {
        config.volume = volume.min(100);
    }
    if muted {
        config.volume = 0;
    }

    info!("Starting interactive session at volume {}", config.volume);

    let scheduler = Arc::new(ThreadScheduler::new());
    let mut controller = match seed {
        Some(seed) => {
            info!("Session RNG seeded with {}", seed);
            SessionController::with_rng(config, scheduler, StdRng::seed_from_u64(seed))
        }
        None => SessionController::new(config, scheduler),
    };

    // Open the output before the alternate screen so a missing device
    // warns on the normal screen
    controller.synth().ensure_output();

    console::run(&mut controller)?;
    controller.stop();

    info!("Session closed");
    Ok(())
}

/// Render a session to a WAV file.
pub fn render(
    output: &Path,
    seconds: f32,
    volume: Option<u32>,
    seed: u64,
    sample_rate: u32,
    config_path: Option<&Path>,
) -> Result<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(GlasscutError::InvalidParameter {
            param: "seconds".to_string(),
            value: seconds.to_string(),
            expected: "> 0".to_string(),
        });
    }
    if sample_rate == 0 {
        return Err(GlasscutError::InvalidParameter {
            param: "sample_rate".to_string(),
            value: sample_rate.to_string(),
            expected: "> 0".to_string(),
        });
    }

    let mut config = load_config(config_path)?;
    if let Some(volume) = volume {
        config.volume = volume.min(100);
    }

    info!(
        "Rendering {:.1}s session (seed {}) to {}",
        seconds,
        seed,
        output.display()
    );

    render_to_wav(output, &config, seconds, seed, sample_rate)?;

    println!(
        "Rendered {:.1}s at {} Hz: {}",
        seconds,
        sample_rate,
        output.display()
    );

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::load(path)
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rejects_bad_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.wav");

        assert!(render(&out, 0.0, None, 0, 8000, None).is_err());
        assert!(render(&out, -1.0, None, 0, 8000, None).is_err());
        assert!(render(&out, 1.0, None, 0, 0, None).is_err());
    }

    #[test]
    fn test_render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("session.wav");

        render(&out, 1.0, Some(80), 1, 8000, None).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_load_config_default_when_unset() {
        let config = load_config(None).unwrap();
        assert_eq!(config.animation.tick_ms, 50);
    }
}
