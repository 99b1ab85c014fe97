//! Biquad filters for tone shaping.
//!
//! The cut tone runs through a high-pass to emphasize brightness; the ambient
//! tone runs through a low-pass to soften it. Coefficients follow the Audio
//! EQ Cookbook formulas.
//! Reference: https://www.w3.org/2011/audio/audio-eq-cookbook.html

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Filter slope direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Remove above the cutoff frequency
    LowPass,
    /// Remove below the cutoff frequency
    HighPass,
}

/// Biquad filter coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, Default)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadCoeffs {
    fn calculate(mode: FilterMode, sample_rate: f64, cutoff: f64, q: f64) -> Self {
        // Clamp cutoff below Nyquist
        let freq = cutoff.clamp(20.0, sample_rate / 2.0 - 1.0);
        let q = q.clamp(0.1, 10.0);

        let w0 = 2.0 * PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * q);

        let (b0, b1, b2, a0, a1, a2) = match mode {
            FilterMode::LowPass => (
                (1.0 - cos_w0) / 2.0,
                1.0 - cos_w0,
                (1.0 - cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            FilterMode::HighPass => (
                (1.0 + cos_w0) / 2.0,
                -(1.0 + cos_w0),
                (1.0 + cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
        };

        // Normalize by a0
        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Single-channel biquad filter with its delay line
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Create a Butterworth-Q filter at the given cutoff
    pub fn new(mode: FilterMode, sample_rate: f32, cutoff_hz: f32) -> Self {
        Self::with_q(mode, sample_rate, cutoff_hz, FRAC_1_SQRT_2 as f32)
    }

    /// Create a filter with an explicit Q factor
    pub fn with_q(mode: FilterMode, sample_rate: f32, cutoff_hz: f32, q: f32) -> Self {
        Self {
            coeffs: BiquadCoeffs::calculate(
                mode,
                sample_rate as f64,
                cutoff_hz as f64,
                q as f64,
            ),
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Process a single sample through the filter
    pub fn process(&mut self, input: f32) -> f32 {
        let x0 = input as f64;
        let output = self.coeffs.b0 * x0 + self.coeffs.b1 * self.x1 + self.coeffs.b2 * self.x2
            - self.coeffs.a1 * self.y1
            - self.coeffs.a2 * self.y2;

        // Shift delay line
        self.x2 = self.x1;
        self.x1 = x0;
        self.y2 = self.y1;
        self.y1 = output;

        output as f32
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
