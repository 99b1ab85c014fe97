//! Amplitude envelopes.
//!
//! Both tone presets share one envelope shape: an optional linear attack up
//! to the peak level, then an exponential decay toward a fixed floor. The
//! exponential segment never reaches zero on its own; the voice ends when the
//! envelope's duration runs out.

/// Decay target of the exponential segment. An envelope is considered
/// inaudible at this level.
pub const ENVELOPE_FLOOR: f32 = 0.001;

/// Linear-attack / exponential-decay amplitude envelope
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    peak: f32,
    attack_samples: usize,
    total_samples: usize,
}

impl Envelope {
    /// Create an envelope
    ///
    /// # Arguments
    /// * `peak` - Peak level reached at the end of the attack (0.0-1.0)
    /// * `attack_secs` - Attack length; 0 starts the decay at the peak
    /// * `duration_secs` - Total envelope length including the attack
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(peak: f32, attack_secs: f32, duration_secs: f32, sample_rate: f32) -> Self {
        let total_samples = (duration_secs.max(0.0) * sample_rate) as usize;
        let attack_samples = ((attack_secs.max(0.0) * sample_rate) as usize).min(total_samples);
        Self {
            peak: peak.max(0.0),
            attack_samples,
            total_samples,
        }
    }

    /// Envelope length in samples
    pub fn len(&self) -> usize {
        self.total_samples
    }

    /// True when the envelope has no samples at all
    pub fn is_empty(&self) -> bool {
        self.total_samples == 0
    }

    /// Peak level
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Gain at sample index `i`
    ///
    /// Indices past the duration return 0, so a voice can safely be driven
    /// beyond its end.
    pub fn level(&self, i: usize) -> f32 {
        if i >= self.total_samples || self.peak <= 0.0 {
            return 0.0;
        }

        if i < self.attack_samples {
            return self.peak * i as f32 / self.attack_samples as f32;
        }

        // Exponential decay from the peak toward the floor
        let floor = ENVELOPE_FLOOR.min(self.peak);
        let decay_len = (self.total_samples - self.attack_samples).max(1);
        let frac = (i - self.attack_samples) as f32 / decay_len as f32;
        self.peak * (floor / self.peak).powf(frac)
    }
}
