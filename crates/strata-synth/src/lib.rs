//! Strata Synth - Layered polyphonic synthesis engine
//!
//! This crate turns discrete control events into a stream of fixed-size
//! audio buffers. Sound is produced by a four-level mixing tree:
//!
//! ```text
//! Synth ── 4 × Layer ── 4 × OscSlot ── up to 25 held + 10 releasing Voices
//! ```
//!
//! Events flow down the tree ([`Synth::apply`]); audio is pulled up once per
//! buffer ([`Synth::next_buffer`]). Each level sums its children and scales
//! the result, so a fully loaded tree stays in a sane range without hard
//! clipping.
//!
//! # Core Components
//!
//! - [`Synth`] - Master gain and layer selection
//! - [`Layer`] - Four slots with mute flags, slot selection and layer gain
//! - [`OscSlot`] - Fixed-capacity voice tables and master modulator templates
//! - [`Voice`] - One sounding note with private modulator copies
//! - [`ControlEvent`] / [`Action`] - The `(action, target, value)` protocol
//! - [`Engine`] - Bounded control queue drained between buffers (`std` only)
//!
//! # Example
//!
//! ```rust
//! use strata_synth::{Action, ControlEvent, Synth};
//! use strata_core::BUFFER_SAMPLES;
//!
//! let mut synth = Synth::new(44_100);
//!
//! // Give the selected slot a ~260 ms release, then play and release A4
//! synth.apply(&ControlEvent::new(Action::EnvRelease, 0, 0.25));
//! synth.apply(&ControlEvent::note_on(0));
//!
//! let mut out = [0.0; BUFFER_SAMPLES];
//! synth.next_buffer(&mut out);
//!
//! synth.apply(&ControlEvent::note_off(0));
//! synth.next_buffer(&mut out);
//! assert!(synth.voice_count() > 0);
//! ```
//!
//! # Features
//!
//! - `std` (default): enables [`Engine`] via `crossbeam-channel`
//! - `serde`: `Serialize`/`Deserialize` for the control types
//! - `tracing`: `debug!` events on the control path (dropped notes,
//!   abandoned release tails, rejected selections)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod control;
#[cfg(feature = "std")]
pub mod engine;
pub mod layer;
pub mod slot;
pub mod synth;
pub mod voice;

// Re-export main types at crate root
pub use control::{Action, ControlEvent, ModTarget, ParseActionError};
#[cfg(feature = "std")]
pub use engine::{ControlSender, Engine, SendError};
pub use layer::{Layer, OSCS_PER_LAYER};
pub use slot::{MAX_RELEASING, MAX_VOICES, OscSlot};
pub use synth::{LAYERS, Synth};
pub use voice::{Modulators, Voice};
