//! Sine oscillator source.
//!
//! Voices draw their raw signal from a phase-accumulating sine generator.
//! The oscillator is an infinite iterator; the envelope decides when a voice
//! ends.

use std::f32::consts::TAU;

/// Phase-accumulating sine wave generator
#[derive(Debug, Clone)]
pub struct SineOscillator {
    frequency: f32,
    sample_rate: f32,
    phase: f32,
}

impl SineOscillator {
    /// Create an oscillator at the given frequency and sample rate
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        Self {
            frequency,
            sample_rate,
            phase: 0.0,
        }
    }

    /// Frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

impl Iterator for SineOscillator {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.phase.sin();
        self.phase += TAU * self.frequency / self.sample_rate;
        // Wrap to keep precision over long run times
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE_RATE: f32 = 48000.0;

    #[test]
    fn test_starts_at_zero() {
        let mut osc = SineOscillator::new(440.0, SAMPLE_RATE);
        let first = osc.next().unwrap();
        assert_relative_eq!(first, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_peak_at_quarter_period() {
        // 480 Hz at 48 kHz gives exactly 100 samples per cycle
        let osc = SineOscillator::new(480.0, SAMPLE_RATE);
        let samples: Vec<f32> = osc.take(100).collect();

        // Quarter period is sample 25
        assert_relative_eq!(samples[25], 1.0, epsilon = 1e-3);
        // Half period crosses zero
        assert_relative_eq!(samples[50], 0.0, epsilon = 1e-3);
        // Three quarters is the trough
        assert_relative_eq!(samples[75], -1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_full_scale_output() {
        let osc = SineOscillator::new(2500.0, SAMPLE_RATE);
        let samples: Vec<f32> = osc.take(4800).collect();

        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak > 0.99 && peak <= 1.0 + 1e-6, "peak = {}", peak);
    }

    #[test]
    fn test_rms_of_unit_sine() {
        let osc = SineOscillator::new(480.0, SAMPLE_RATE);
        // Whole number of cycles so the RMS is exact
        let samples: Vec<f32> = osc.take(1000).collect();

        let rms =
            (samples.iter().map(|s| (*s as f64).powi(2)).sum::<f64>() / samples.len() as f64)
                .sqrt();
        assert_relative_eq!(rms, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-3);
    }

    #[test]
    fn test_phase_stays_bounded() {
        let mut osc = SineOscillator::new(3000.0, SAMPLE_RATE);
        for _ in 0..100_000 {
            osc.next();
        }
        assert!(osc.phase.is_finite());
        assert!(osc.phase < TAU);
    }
}
