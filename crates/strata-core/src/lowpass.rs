//! Time-varying low-pass biquad.
//!
//! The filter has no stored cutoff: coefficients are recomputed for every
//! sample from a caller-supplied cutoff curve (the voice's filter envelope).
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.

use crate::consts::{Buffer, FILTER_Q};
use core::f32::consts::PI;
use libm::{cosf, sinf};

/// Lowest cutoff the voice filter accepts, in Hz.
pub const MIN_STABLE_HZ: f32 = 1.0;

/// Highest cutoff the voice filter accepts, as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (the voice filter uses 1/√2)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn lowpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Direct Form I history of the voice low-pass filter.
///
/// ```text
/// y[n] = (b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]) / a0
/// ```
///
/// Input samples are mapped from [0, 1] to [−1, 1] before filtering and the
/// result is mapped back, so the history holds the remapped values. A fresh
/// state has all-zero history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LowPassState {
    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,
    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl LowPassState {
    /// Creates a filter with cleared history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters `samples` in place, using `cutoff[i]` (Hz) for sample `i`.
    ///
    /// Cutoffs are clamped between [`MIN_STABLE_HZ`] and 0.49 × the sample
    /// rate; the recurrence is unstable outside that range.
    pub fn process(&mut self, samples: &mut Buffer, cutoff: &Buffer, sample_rate: u32) {
        let sample_rate = sample_rate as f32;
        let max_freq = sample_rate * MAX_CUTOFF_RATIO;

        for (sample, &freq) in samples.iter_mut().zip(cutoff.iter()) {
            let freq = freq.clamp(MIN_STABLE_HZ, max_freq);
            let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(freq, FILTER_Q, sample_rate);

            let input = *sample * 2.0 - 1.0;
            let output = (b0 * input + b1 * self.x1 + b2 * self.x2 - a1 * self.y1 - a2 * self.y2)
                / a0;

            self.x2 = self.x1;
            self.x1 = input;
            self.y2 = self.y1;
            self.y1 = output;

            *sample = (output + 1.0) / 2.0;
        }
    }

    /// Clears the filter history.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
