//! Naive (non band-limited) waveform generator driven by per-sample curves.
//!
//! The oscillator holds no frequency of its own. Every sample its pitch is
//! recomputed from the voice's note number, the owning slot's live pitch
//! value, and the pitch-shape curve, so pitch bends and pitch modulation
//! take effect sample-accurately.

use crate::consts::Buffer;
use crate::math::{note_to_hz, wrap_phase};
use core::f32::consts::TAU;
use libm::sinf;

/// Oscillator waveform types, in the order the waveform control cycles them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure fundamental tone.
    #[default]
    Sine,
    /// ±1 square, sign of the sine.
    Square,
    /// Rising ramp from −1 to 1.
    Saw,
    /// Symmetric triangle.
    Triangle,
}

impl Waveform {
    /// Every waveform in cycle order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Saw,
        Waveform::Triangle,
    ];

    /// Position of this waveform in the cycle (0..4).
    pub fn index(self) -> usize {
        match self {
            Waveform::Sine => 0,
            Waveform::Square => 1,
            Waveform::Saw => 2,
            Waveform::Triangle => 3,
        }
    }

    /// Waveform at `index`, or `None` when out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The waveform after this one, wrapping Triangle back to Sine.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Value of the unit waveform at `phase` in [0.0, 1.0).
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => sinf(TAU * phase),
            Waveform::Square => {
                if sinf(TAU * phase) > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
        }
    }
}

/// Phase accumulator and waveform of one sounding voice.
///
/// # Example
///
/// ```rust
/// use strata_core::{OscillatorState, Waveform, BUFFER_SAMPLES};
///
/// // Note 12 is A5 (880 Hz)
/// let mut osc = OscillatorState::new(Waveform::Saw, 12, 44_100);
/// let amp = [0.5; BUFFER_SAMPLES];
/// let pitch = [1.0; BUFFER_SAMPLES];
///
/// let mut out = [0.0; BUFFER_SAMPLES];
/// osc.render(&mut out, &amp, &pitch, 0.0);
/// assert!(out.iter().all(|s| s.abs() <= 0.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorState {
    waveform: Waveform,
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Semitones from A4
    note: i32,
    sample_rate: u32,
}

impl OscillatorState {
    /// Create an oscillator at phase 0.
    pub fn new(waveform: Waveform, note: i32, sample_rate: u32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            note,
            sample_rate,
        }
    }

    /// Get the waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Get the note number (semitones from A4).
    pub fn note(&self) -> i32 {
        self.note
    }

    /// Current phase (0.0 - 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Fill `out` with one buffer of the waveform.
    ///
    /// For sample `i` the pitch is `shared_pitch · pitch[i] + note` semitones
    /// from A4 and the output is scaled by `amp[i]`. The sample is taken at
    /// the current phase, then the phase advances.
    pub fn render(&mut self, out: &mut Buffer, amp: &Buffer, pitch: &Buffer, shared_pitch: f32) {
        let sample_rate = self.sample_rate as f32;
        let note = self.note as f32;
        let mut phase = self.phase;

        for ((sample, &gain), &shift) in out.iter_mut().zip(amp.iter()).zip(pitch.iter()) {
            let hz = note_to_hz(shared_pitch * shift + note);
            *sample = self.waveform.sample(phase) * gain;
            phase = wrap_phase(phase + hz / sample_rate);
        }

        self.phase = phase;
    }
}
