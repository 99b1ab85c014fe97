//! Procedural tone synthesis.
//!
//! Two tone presets drive the whole sound of the engine: a short bright
//! cutting tone and a long soft ambient drone. Each request builds one
//! disposable voice (oscillator -> filter -> envelope) scaled by the volume
//! level read at that moment, and hands it to the live output if one exists.
//!
//! If no output device is available the synthesizer stays silent and play
//! calls are no-ops; nothing in the session loop ever sees the failure.

mod envelope;
mod filter;
mod oscillator;
mod output;
mod voice;

pub use envelope::{Envelope, ENVELOPE_FLOOR};
pub use filter::{Biquad, FilterMode};
pub use oscillator::SineOscillator;
pub use output::AudioOutput;
pub use voice::Voice;

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use rand::Rng;

use crate::config::TonePreset;

/// Shared volume level (0-100)
///
/// The synthesizer reads the level at every synthesis call; user controls
/// write it from wherever they live.
#[derive(Debug)]
pub struct VolumeControl(AtomicU32);

impl VolumeControl {
    /// Create a control at the given level, clamped to 0-100
    pub fn new(level: u32) -> Self {
        Self(AtomicU32::new(level.min(100)))
    }

    /// Current level
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Set the level, clamped to 0-100
    pub fn set(&self, level: u32) {
        self.0.store(level.min(100), Ordering::Relaxed);
    }

    /// Nudge the level by a signed delta, clamped to 0-100
    pub fn adjust(&self, delta: i32) -> u32 {
        let current = self.get() as i32;
        let next = (current + delta).clamp(0, 100) as u32;
        self.set(next);
        next
    }

    /// Level as a 0.0-1.0 fraction
    pub fn as_fraction(&self) -> f32 {
        self.get() as f32 / 100.0
    }
}

/// Lazily-initialized output state
enum OutputSlot {
    Uninitialized,
    Ready(AudioOutput),
    Unavailable,
}

/// Builds and dispatches tone voices
pub struct ToneSynthesizer {
    cut: TonePreset,
    ambient: TonePreset,
    volume: Arc<VolumeControl>,
    output: Mutex<OutputSlot>,
    cut_tones: AtomicU64,
    ambient_tones: AtomicU64,
}

impl ToneSynthesizer {
    /// Create a synthesizer from the two presets and a shared volume control
    pub fn new(cut: TonePreset, ambient: TonePreset, volume: Arc<VolumeControl>) -> Self {
        Self {
            cut,
            ambient,
            volume,
            output: Mutex::new(OutputSlot::Uninitialized),
            cut_tones: AtomicU64::new(0),
            ambient_tones: AtomicU64::new(0),
        }
    }

    /// Initialize the live output if it has not been attempted yet
    ///
    /// Idempotent: the first call tries to open the device; later calls and
    /// repeated session starts reuse whatever that attempt produced. An
    /// unavailable output is logged once and the synthesizer stays silent.
    pub fn ensure_output(&self) {
        let Ok(mut slot) = self.output.lock() else {
            return;
        };
        if matches!(*slot, OutputSlot::Uninitialized) {
            match AudioOutput::open() {
                Ok(output) => {
                    debug!("Audio output ready at {} Hz", output.sample_rate());
                    *slot = OutputSlot::Ready(output);
                }
                Err(e) => {
                    warn!("Audio output unavailable, tones will be silent: {}", e);
                    *slot = OutputSlot::Unavailable;
                }
            }
        }
    }

    /// True when a live output stream is running
    pub fn output_available(&self) -> bool {
        self.output
            .lock()
            .map(|slot| matches!(*slot, OutputSlot::Ready(_)))
            .unwrap_or(false)
    }

    /// Play the short cutting tone
    pub fn play_cut_tone(&self, rng: &mut impl Rng) {
        self.cut_tones.fetch_add(1, Ordering::Relaxed);
        self.play(&self.cut, rng);
    }

    /// Play the soft ambient tone
    pub fn play_ambient_tone(&self, rng: &mut impl Rng) {
        self.ambient_tones.fetch_add(1, Ordering::Relaxed);
        self.play(&self.ambient, rng);
    }

    fn play(&self, preset: &TonePreset, rng: &mut impl Rng) {
        let Ok(slot) = self.output.lock() else {
            return;
        };
        if let OutputSlot::Ready(output) = &*slot {
            let voice = build_voice(
                preset,
                self.volume.as_fraction(),
                output.sample_rate() as f32,
                rng,
            );
            output.submit(voice);
        }
    }

    /// Render the cutting tone offline at the given sample rate
    pub fn render_cut_tone(&self, rng: &mut impl Rng, sample_rate: u32) -> Vec<f32> {
        build_voice(&self.cut, self.volume.as_fraction(), sample_rate as f32, rng).render()
    }

    /// Render the ambient tone offline at the given sample rate
    pub fn render_ambient_tone(&self, rng: &mut impl Rng, sample_rate: u32) -> Vec<f32> {
        build_voice(
            &self.ambient,
            self.volume.as_fraction(),
            sample_rate as f32,
            rng,
        )
        .render()
    }

    /// Number of cut tones requested so far, silent or not
    pub fn cut_tones_requested(&self) -> u64 {
        self.cut_tones.load(Ordering::Relaxed)
    }

    /// Number of ambient tones requested so far, silent or not
    pub fn ambient_tones_requested(&self) -> u64 {
        self.ambient_tones.load(Ordering::Relaxed)
    }

    /// The shared volume control
    pub fn volume(&self) -> &VolumeControl {
        &self.volume
    }
}

/// Assemble a single-use voice for a preset at the current volume
///
/// A collapsed frequency band plays its low edge.
fn build_voice(
    preset: &TonePreset,
    volume_fraction: f32,
    sample_rate: f32,
    rng: &mut impl Rng,
) -> Voice {
    let frequency = if preset.freq_hi > preset.freq_lo {
        rng.gen_range(preset.freq_lo..preset.freq_hi)
    } else {
        preset.freq_lo
    };
    Voice::new(
        SineOscillator::new(frequency, sample_rate),
        Biquad::new(preset.filter, sample_rate, preset.cutoff_hz),
        Envelope::new(
            preset.level * volume_fraction,
            preset.attack_secs(),
            preset.duration_secs(),
            sample_rate,
        ),
    )
}
