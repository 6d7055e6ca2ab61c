//! Attack-decay-sustain-release envelope template.
//!
//! Unlike a free-running ADSR, an [`EnvelopeTemplate`] is evaluated a whole
//! buffer at a time from a running sample position, so a voice can clone the
//! template at note-on and replay the exact same curve.

use crate::consts::{BUFFER_SAMPLES, Buffer};
use crate::math::samples_per_ms;
use libm::powf;

/// Normalizer for the attack curve: `2^2.56 − 1`, so attack reaches 1.0.
const ATTACK_NORM: f32 = 4.8971;
/// Exponent scale of the attack curve.
const ATTACK_CURVE: f32 = 2.56;
/// Decay and release fall to 1% of their span at the segment boundary.
const FALLOFF: f32 = 0.01;

/// ADSR envelope template scaled to a target value.
///
/// The curve is a pure function of the running position:
///
/// ```text
/// attack   (2^(2.56·s/A) − 1) / 4.8971          0 → 1
/// decay    0.01^(s/D) · (1 − S) + S             → S, until A + D
/// sustain  S
/// release  0.01^(s/R) · S                       S → 0, exactly 0 past R
/// ```
///
/// `s` counts from note-on for every non-release segment, so with a nonzero
/// attack the decay picks up part-way down its curve.
///
/// Each sample is emitted as `percent / S · target`, so the sustain plateau
/// equals the target value. A sustain level of exactly 0 mutes the envelope
/// entirely: [`render`](Self::render) leaves the buffer untouched and the
/// position does not advance. A release of 0 ms behaves the same way once
/// releasing (the caller treats the untouched zero buffer as silence).
///
/// # Example
///
/// ```rust
/// use strata_core::{EnvelopeTemplate, BUFFER_SAMPLES};
///
/// let mut env = EnvelopeTemplate::new(44_100);
/// env.set_target(0.5);
///
/// let mut out = [0.0; BUFFER_SAMPLES];
/// env.render(&mut out);
/// assert!(out.iter().all(|&s| s == 0.5));
///
/// env.start_release();
/// assert_eq!(env.position(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeTemplate {
    attack_ms: u32,
    decay_ms: u32,
    /// Sustain level, 0.0 to 1.0
    sustain: f32,
    release_ms: u32,
    /// Value the normalized curve is scaled to
    target: f32,
    /// Running position in samples since note-on (or since release began)
    position: u64,
    releasing: bool,
    sample_rate: u32,
}

impl Default for EnvelopeTemplate {
    fn default() -> Self {
        Self::new(crate::consts::DEFAULT_SAMPLE_RATE)
    }
}

impl EnvelopeTemplate {
    /// Create a template with zero attack/decay/release, full sustain, and a
    /// target of 1.0.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            attack_ms: 0,
            decay_ms: 0,
            sustain: 1.0,
            release_ms: 0,
            target: 1.0,
            position: 0,
            releasing: false,
            sample_rate,
        }
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, ms: u32) {
        self.attack_ms = ms;
    }

    /// Get attack time in milliseconds.
    pub fn attack_ms(&self) -> u32 {
        self.attack_ms
    }

    /// Set decay time in milliseconds.
    pub fn set_decay_ms(&mut self, ms: u32) {
        self.decay_ms = ms;
    }

    /// Get decay time in milliseconds.
    pub fn decay_ms(&self) -> u32 {
        self.decay_ms
    }

    /// Set sustain level (0.0 to 1.0).
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level.clamp(0.0, 1.0);
    }

    /// Get sustain level.
    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, ms: u32) {
        self.release_ms = ms;
    }

    /// Get release time in milliseconds.
    pub fn release_ms(&self) -> u32 {
        self.release_ms
    }

    /// Set the value the curve is scaled to.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Get the value the curve is scaled to.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Running position in samples.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the release segment has started.
    pub fn is_releasing(&self) -> bool {
        self.releasing
    }

    /// Enter the release segment. The position restarts at 0 so the release
    /// curve begins at the sustain level.
    pub fn start_release(&mut self) {
        self.releasing = true;
        self.position = 0;
    }

    /// Whether [`render`](Self::render) would leave its buffer untouched.
    pub fn is_bypassed(&self) -> bool {
        self.sustain == 0.0 || (self.releasing && self.release_samples() == 0)
    }

    fn attack_samples(&self) -> u64 {
        u64::from(self.attack_ms) * u64::from(samples_per_ms(self.sample_rate))
    }

    fn decay_samples(&self) -> u64 {
        u64::from(self.decay_ms) * u64::from(samples_per_ms(self.sample_rate))
    }

    fn release_samples(&self) -> u64 {
        u64::from(self.release_ms) * u64::from(samples_per_ms(self.sample_rate))
    }

    /// Write one buffer of the envelope into `out` and advance the position.
    ///
    /// `out` is expected to be zero-filled; when the envelope is bypassed it
    /// is left as-is.
    pub fn render(&mut self, out: &mut Buffer) {
        if self.is_bypassed() {
            return;
        }

        let attack = self.attack_samples();
        let decay = self.decay_samples();
        let release = self.release_samples();
        let sustain = self.sustain;
        let scale = self.target / sustain;

        for (i, sample) in out.iter_mut().enumerate() {
            let s = self.position + i as u64;

            let percent = if !self.releasing {
                if attack != 0 && s < attack {
                    (powf(2.0, ATTACK_CURVE * (s as f32 / attack as f32)) - 1.0) / ATTACK_NORM
                } else if decay != 0 && s < attack + decay {
                    powf(FALLOFF, s as f32 / decay as f32) * (1.0 - sustain) + sustain
                } else {
                    sustain
                }
            } else if s < release {
                powf(FALLOFF, s as f32 / release as f32) * sustain
            } else {
                *sample = 0.0;
                continue;
            };

            *sample = percent * scale;
        }

        self.position += BUFFER_SAMPLES as u64;
    }
}
