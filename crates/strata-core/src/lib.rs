//! Strata Core - DSP primitives for the strata synthesizer
//!
//! This crate provides the per-buffer signal generators every strata voice is
//! built from. Each primitive is a plain value that transforms one fixed-size
//! buffer per call, so a voice can own private copies of them and the audio
//! path never allocates.
//!
//! # Core Components
//!
//! ## Modulators
//!
//! - [`EnvelopeTemplate`] - Attack/decay/sustain/release curve scaled to a target value
//! - [`LfoTemplate`] - Unipolar cosine LFO used as a multiplicative modulator
//!
//! ## Signal Path
//!
//! - [`OscillatorState`] - Phase-accumulating oscillator with four [`Waveform`]s
//! - [`LowPassState`] - RBJ low-pass biquad driven by a per-sample cutoff curve
//!
//! ## Utilities
//!
//! - Engine constants: [`BUFFER_SAMPLES`], [`MAX_CUTOFF`], [`MIDI_TO_A4`], etc.
//! - Math: [`note_to_hz`], [`control_to_ms`], [`wrap_phase`]
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Buffer, EnvelopeTemplate, LfoTemplate, BUFFER_SAMPLES};
//!
//! let mut env = EnvelopeTemplate::new(44_100);
//! env.set_attack_ms(10);
//! env.set_sustain(0.8);
//!
//! let mut amp: Buffer = [0.0; BUFFER_SAMPLES];
//! env.render(&mut amp);
//!
//! // LFO buffers start at 1.0 so a bypassed LFO is the identity.
//! let mut lfo_out: Buffer = [1.0; BUFFER_SAMPLES];
//! LfoTemplate::new(44_100).render(&mut lfo_out);
//! assert!(lfo_out.iter().all(|&s| s == 1.0));
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! strata-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod consts;
pub mod envelope;
pub mod lfo;
pub mod lowpass;
pub mod math;
pub mod oscillator;

// Re-export main types at crate root
pub use consts::{
    BUFFER_SAMPLES, Buffer, DEFAULT_SAMPLE_RATE, FILTER_Q, MAX_CUTOFF, MIDI_TO_A4, MIN_CUTOFF,
};
pub use envelope::EnvelopeTemplate;
pub use lfo::LfoTemplate;
pub use lowpass::{LowPassState, lowpass_coefficients};
pub use math::{control_to_ms, ms_to_samples, note_to_hz, samples_per_ms, wrap_phase};
pub use oscillator::{OscillatorState, Waveform};
