//! Low frequency oscillator used as a multiplicative modulator.
//!
//! The LFO does not produce a bipolar modulation signal. It writes a unipolar
//! gain curve that the voice multiplies into an envelope, so the caller fills
//! the buffer with 1.0 first and a bypassed LFO is the identity.

use crate::consts::Buffer;
use crate::math::wrap_phase;
use core::f32::consts::TAU;
use libm::cosf;

/// Cosine LFO template.
///
/// Per sample the phase advances by `rate / sample_rate` (wrapped to
/// [0.0, 1.0)) and the output is:
///
/// ```text
/// ((cos(2π·phase) + 1) / 2) · amplitude · percent_effect
/// ```
///
/// When rate, amplitude, or percent-effect is zero the template is bypassed:
/// the buffer is left untouched and the phase does not move. The phase is
/// otherwise continuous across buffers.
///
/// # Example
///
/// ```rust
/// use strata_core::{LfoTemplate, BUFFER_SAMPLES};
///
/// let mut lfo = LfoTemplate::new(44_100);
/// lfo.set_rate_hz(5.0);
/// lfo.set_percent_effect(0.5);
///
/// let mut out = [1.0; BUFFER_SAMPLES];
/// lfo.render(&mut out);
/// assert!(out.iter().all(|&s| (0.0..=0.5).contains(&s)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LfoTemplate {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    rate_hz: f32,
    amplitude: f32,
    percent_effect: f32,
    sample_rate: u32,
}

impl Default for LfoTemplate {
    fn default() -> Self {
        Self::new(crate::consts::DEFAULT_SAMPLE_RATE)
    }
}

impl LfoTemplate {
    /// Create a bypassed LFO: rate 0 Hz, amplitude 1.0, percent-effect 0.0.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            phase: 0.0,
            rate_hz: 0.0,
            amplitude: 1.0,
            percent_effect: 0.0,
            sample_rate,
        }
    }

    /// Set rate in Hz.
    pub fn set_rate_hz(&mut self, hz: f32) {
        self.rate_hz = hz.max(0.0);
    }

    /// Get rate in Hz.
    pub fn rate_hz(&self) -> f32 {
        self.rate_hz
    }

    /// Set depth.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Get depth.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Set how much of the LFO is mixed into its target.
    pub fn set_percent_effect(&mut self, percent: f32) {
        self.percent_effect = percent;
    }

    /// Get how much of the LFO is mixed into its target.
    pub fn percent_effect(&self) -> f32 {
        self.percent_effect
    }

    /// Current phase (0.0 - 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Whether [`render`](Self::render) would leave its buffer untouched.
    pub fn is_bypassed(&self) -> bool {
        self.rate_hz == 0.0 || self.amplitude == 0.0 || self.percent_effect == 0.0
    }

    /// Overwrite `out` with one buffer of the LFO curve.
    pub fn render(&mut self, out: &mut Buffer) {
        if self.is_bypassed() {
            return;
        }

        let phase_inc = self.rate_hz / self.sample_rate as f32;
        let depth = self.amplitude * self.percent_effect;
        let mut phase = self.phase;

        for sample in out.iter_mut() {
            phase = wrap_phase(phase + phase_inc);
            let wave = cosf(TAU * phase);
            *sample = (wave + 1.0) / 2.0 * depth;
        }

        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BUFFER_SAMPLES;

    #[test]
    fn test_default_is_bypassed() {
        let mut lfo = LfoTemplate::new(44_100);
        let mut out = [1.0; BUFFER_SAMPLES];
        lfo.render(&mut out);
        assert!(out.iter().all(|&s| s == 1.0));
        assert_eq!(lfo.phase(), 0.0);
    }

    #[test]
    fn test_output_range() {
        let mut lfo = LfoTemplate::new(44_100);
        lfo.set_rate_hz(20.0);
        lfo.set_amplitude(0.8);
        lfo.set_percent_effect(1.0);

        for _ in 0..20 {
            let mut out = [1.0; BUFFER_SAMPLES];
            lfo.render(&mut out);
            assert!(out.iter().all(|&s| (0.0..=0.8 + 1e-6).contains(&s)));
        }
    }

    #[test]
    fn test_phase_is_continuous_across_buffers() {
        let mut split = LfoTemplate::new(44_100);
        split.set_rate_hz(3.0);
        split.set_percent_effect(1.0);
        let mut whole = split.clone();

        let mut a = [1.0; BUFFER_SAMPLES];
        let mut b = [1.0; BUFFER_SAMPLES];
        split.render(&mut a);
        split.render(&mut b);

        // One step past the end of `a` must be the first sample of `b`
        let inc = 3.0 / 44_100.0;
        let expected_phase = wrap_phase(whole.phase() + inc * (BUFFER_SAMPLES as f32 + 1.0));
        let expected = (cosf(TAU * expected_phase) + 1.0) / 2.0;
        assert!((b[0] - expected).abs() < 1e-4, "{} vs {}", b[0], expected);

        let mut c = [1.0; BUFFER_SAMPLES];
        whole.render(&mut c);
        assert_eq!(a, c);
    }

    #[test]
    fn test_one_cycle_per_period() {
        let mut lfo = LfoTemplate::new(44_100);
        lfo.set_rate_hz(1.0);
        lfo.set_percent_effect(1.0);

        // 44100 samples ≈ 172.27 buffers; after 172 buffers the phase is near 0.998
        for _ in 0..172 {
            let mut out = [1.0; BUFFER_SAMPLES];
            lfo.render(&mut out);
        }
        let expected = wrap_phase(172.0 * BUFFER_SAMPLES as f32 / 44_100.0);
        let diff = (lfo.phase() - expected).abs();
        assert!(diff.min(1.0 - diff) < 5e-3, "phase {} vs {}", lfo.phase(), expected);
    }
}
