//! Single-use signal chains.
//!
//! A voice wires one oscillator through one filter and one envelope. It is
//! created per tone request, yields samples until its envelope ends, and is
//! then dropped by whoever is driving it. Voices are never reused.

use super::envelope::Envelope;
use super::filter::Biquad;
use super::oscillator::SineOscillator;

/// One oscillator -> filter -> envelope chain
#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: SineOscillator,
    filter: Biquad,
    envelope: Envelope,
    position: usize,
}

impl Voice {
    /// Assemble a voice from its stages
    pub fn new(oscillator: SineOscillator, filter: Biquad, envelope: Envelope) -> Self {
        Self {
            oscillator,
            filter,
            envelope,
            position: 0,
        }
    }

    /// Oscillator frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }

    /// Total length in samples
    pub fn len(&self) -> usize {
        self.envelope.len()
    }

    /// True when the voice has no samples at all
    pub fn is_empty(&self) -> bool {
        self.envelope.is_empty()
    }

    /// True once every sample has been consumed
    pub fn is_finished(&self) -> bool {
        self.position >= self.envelope.len()
    }

    /// Consume the voice into a sample buffer (offline path)
    pub fn render(self) -> Vec<f32> {
        self.collect()
    }
}

impl Iterator for Voice {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.is_finished() {
            return None;
        }
        let raw = self.oscillator.next()?;
        let filtered = self.filter.process(raw);
        let sample = filtered * self.envelope.level(self.position);
        self.position += 1;
        Some(sample)
    }
}
