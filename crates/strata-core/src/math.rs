//! Pitch, time, and phase conversions used across the engine.
//!
//! All functions are allocation-free and suitable for `no_std`.

use libm::{expf, floorf, powf};

/// Convert a note offset in semitones from A4 to a frequency in Hz.
///
/// Equal temperament with A4 = 440 Hz; fractional offsets are allowed.
///
/// # Example
/// ```rust
/// use strata_core::note_to_hz;
///
/// assert!((note_to_hz(0.0) - 440.0).abs() < 1e-3);
/// assert!((note_to_hz(12.0) - 880.0).abs() < 1e-2);
/// ```
#[inline]
pub fn note_to_hz(semitones: f32) -> f32 {
    440.0 * powf(2.0, semitones / 12.0)
}

/// Whole samples per millisecond at `sample_rate` (integer quotient).
#[inline]
pub fn samples_per_ms(sample_rate: u32) -> u32 {
    sample_rate / 1000
}

/// Convert a duration in milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: u32, sample_rate: u32) -> u64 {
    u64::from(ms) * u64::from(samples_per_ms(sample_rate))
}

/// Map a normalized control value (0.0 to 1.0) to an envelope time.
///
/// The curve is exponential so the low end of a fader has fine resolution:
/// `ms = (e^(2.85·v) − 1) / 2 · 500`, truncated. 0.0 → 0 ms, 1.0 → ~4077 ms.
#[inline]
pub fn control_to_ms(value: f32) -> u32 {
    let ms = (expf(value * 2.85) - 1.0) / 2.0 * 500.0;
    ms.max(0.0) as u32
}

/// Wrap a phase into [0.0, 1.0). Non-finite input wraps to 0.0.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let r = phase - floorf(phase);
    if r >= 1.0 || !r.is_finite() { 0.0 } else { r }
}
