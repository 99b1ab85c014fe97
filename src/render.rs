//! Offline session rendering.
//!
//! Replays the tick loop without a scheduler or output device and mixes
//! the tones it plays into one mono buffer. The same configuration and
//! seed always produce the same audio.

use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animator::CutAnimator;
use crate::config::Config;
use crate::error::Result;
use crate::synth::{ToneSynthesizer, VolumeControl};

/// Render a session of the given length to a mono sample buffer
///
/// Ticks are laid out on the configured period; each tone starts on the
/// tick that requested it and runs its full envelope, truncated only by the
/// end of the buffer.
pub fn render_session(config: &Config, seconds: f32, seed: u64, sample_rate: u32) -> Vec<f32> {
    let volume = Arc::new(VolumeControl::new(config.volume));
    let synth = ToneSynthesizer::new(
        config.cut_tone.clone(),
        config.ambient_tone.clone(),
        volume,
    );
    let mut rng = StdRng::seed_from_u64(seed);
    let mut animator = CutAnimator::new(&config.animation, &config.scene);

    let total_samples = (seconds * sample_rate as f32) as usize;
    let mut buffer = vec![0.0f32; total_samples];

    let tick_secs = config.animation.tick_ms as f32 / 1000.0;
    let ticks = (seconds / tick_secs) as usize;
    let ambient_chance = config.animation.ambient_chance.clamp(0.0, 1.0);

    for n in 0..ticks {
        let offset = ((n + 1) as f32 * tick_secs * sample_rate as f32) as usize;
        let update = animator.tick(&mut rng);

        if update.cut_tone {
            let tone = synth.render_cut_tone(&mut rng, sample_rate);
            mix_at(&mut buffer, offset, &tone);
        }
        if rng.gen_bool(ambient_chance) {
            let tone = synth.render_ambient_tone(&mut rng, sample_rate);
            mix_at(&mut buffer, offset, &tone);
        }
    }

    buffer
}

/// Render a session straight to a 16-bit mono WAV file
///
/// # Arguments
///
/// * `path` - Destination file, overwritten if present
/// * `config` - Session configuration, volume included
/// * `seconds` - Length of the rendered session
/// * `seed` - RNG seed; rerenders with the same seed are identical
/// * `sample_rate` - Output sample rate in Hz
pub fn render_to_wav(
    path: &Path,
    config: &Config,
    seconds: f32,
    seed: u64,
    sample_rate: u32,
) -> Result<()> {
    let samples = render_session(config, seconds, seed, sample_rate);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in &samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    Ok(())
}

fn mix_at(buffer: &mut [f32], offset: usize, samples: &[f32]) {
    for (i, sample) in samples.iter().enumerate() {
        match buffer.get_mut(offset + i) {
            Some(slot) => *slot += sample,
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;

    fn quiet_ambient_config() -> Config {
        let mut config = Config::default();
        config.animation.ambient_chance = 0.0;
        config
    }

    #[test]
    fn test_render_length_matches_request() {
        let buffer = render_session(&Config::default(), 2.0, 1, RATE);
        assert_eq!(buffer.len(), 16000);
    }

    #[test]
    fn test_same_seed_renders_identically() {
        let config = Config::default();
        let a = render_session(&config, 3.0, 42, RATE);
        let b = render_session(&config, 3.0, 42, RATE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_render_differently() {
        let config = Config::default();
        let a = render_session(&config, 3.0, 1, RATE);
        let b = render_session(&config, 3.0, 2, RATE);
        assert_ne!(a, b);
    }

    #[test]
    fn test_first_tone_lands_at_half_second() {
        // With ambient off, the first sound is the cut tone at progress 20,
        // which fires on tick 10 at the 500ms mark
        let buffer = render_session(&quiet_ambient_config(), 2.0, 5, RATE);
        let first_tone = (0.5 * RATE as f32) as usize;

        assert!(buffer[..first_tone].iter().all(|s| *s == 0.0));
        assert!(buffer[first_tone..].iter().any(|s| s.abs() > 0.001));
    }

    #[test]
    fn test_zero_volume_renders_silence() {
        let mut config = Config::default();
        config.volume = 0;

        let buffer = render_session(&config, 3.0, 1, RATE);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.wav");

        render_to_wav(&path, &Config::default(), 1.0, 3, RATE).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, RATE);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration(), RATE);

        let peak = reader
            .samples::<i16>()
            .map(|s| s.unwrap().unsigned_abs())
            .max()
            .unwrap_or(0);
        assert!(peak > 0, "rendered WAV is silent");
    }
}
