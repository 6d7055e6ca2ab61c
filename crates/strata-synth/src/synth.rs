//! Root of the mixing tree.

use crate::control::{Action, ControlEvent};
use crate::layer::{Layer, child_index};
use strata_core::{BUFFER_SAMPLES, Buffer, DEFAULT_SAMPLE_RATE};

/// Layers per synth.
pub const LAYERS: usize = 4;

/// Four-layer polyphonic synthesizer.
///
/// Control events go in through [`apply`](Self::apply); audio comes out one
/// fixed-size buffer at a time through [`next_buffer`](Self::next_buffer).
/// The two must not interleave mid-buffer, which `&mut self` enforces on a
/// single thread. Use [`Engine`](crate::Engine) to feed events from another
/// thread.
///
/// # Example
///
/// ```rust
/// use strata_synth::{ControlEvent, Synth};
/// use strata_core::BUFFER_SAMPLES;
///
/// let mut synth = Synth::new(44_100);
/// synth.apply(&ControlEvent::note_on(0)); // A4
///
/// let mut out = [0.0; BUFFER_SAMPLES];
/// synth.next_buffer(&mut out);
/// assert!(out.iter().any(|&s| s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Synth {
    layers: [Layer; LAYERS],
    selected: usize,
    amp: f32,
    sample_rate: u32,
}

impl Default for Synth {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl Synth {
    /// Create a synth of default layers, layer 0 selected, master gain 1.0.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            layers: core::array::from_fn(|_| Layer::new(sample_rate)),
            selected: 0,
            amp: 1.0,
            sample_rate,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Master gain.
    pub fn amp(&self) -> f32 {
        self.amp
    }

    /// Set the master gain.
    pub fn set_amp(&mut self, amp: f32) {
        self.amp = amp;
    }

    /// Index of the selected layer.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Layer at `index`.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Mutable layer at `index`.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    /// Held plus releasing voices across the whole tree.
    pub fn voice_count(&self) -> usize {
        self.layers.iter().map(Layer::voice_count).sum()
    }

    /// Apply one control event.
    ///
    /// Out-of-range targets and unknown combinations are ignored; no input
    /// can panic.
    pub fn apply(&mut self, event: &ControlEvent) {
        match event.action {
            Action::NoOp | Action::Power => {}
            Action::SetVolume => self.amp = event.value,
            Action::LayerSelect => match child_index(event.target, LAYERS) {
                Some(i) => self.selected = i,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(layer = event.target, "layer selection out of range");
                }
            },
            Action::LayerAmp => {
                if let Some(i) = child_index(event.target, LAYERS) {
                    self.layers[i].apply(event);
                }
            }
            _ => self.layers[self.selected].apply(event),
        }
    }

    /// Render one buffer into `out`, overwriting it.
    ///
    /// The layer mix is scaled by `amp / 4`. Output is not clamped.
    pub fn next_buffer(&mut self, out: &mut Buffer) {
        out.fill(0.0);

        let mut scratch = [0.0; BUFFER_SAMPLES];
        for layer in &mut self.layers {
            layer.next_buffer(&mut scratch);
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += s;
            }
        }

        let gain = self.amp / LAYERS as f32;
        for o in out.iter_mut() {
            *o *= gain;
        }
    }
}
