//! Layer: four oscillator slots with mute flags, a selection, and a gain.

use crate::control::{Action, ControlEvent};
use crate::slot::OscSlot;
use strata_core::{BUFFER_SAMPLES, Buffer};

/// Oscillator slots per layer.
pub const OSCS_PER_LAYER: usize = 4;

/// Convert an event target into an in-range child index.
pub(crate) fn child_index(target: i32, len: usize) -> Option<usize> {
    usize::try_from(target).ok().filter(|&i| i < len)
}

/// A group of [`OSCS_PER_LAYER`] oscillator slots played as one part.
///
/// Note-on reaches every unmuted slot, note-off reaches every slot so muted
/// slots still release their voices. Slot-addressed edits (amplitude,
/// filter, cents) go to `slot[target]`; everything else goes to the
/// selected slot.
#[derive(Debug, Clone)]
pub struct Layer {
    slots: [OscSlot; OSCS_PER_LAYER],
    unmuted: [bool; OSCS_PER_LAYER],
    selected: usize,
    amp: f32,
    /// Consecutive recorder stops; the second one restores default slots
    stop_count: u32,
    sample_rate: u32,
}

impl Layer {
    /// Create a layer of default slots, all unmuted, slot 0 selected.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            slots: core::array::from_fn(|_| OscSlot::new(sample_rate)),
            unmuted: [true; OSCS_PER_LAYER],
            selected: 0,
            amp: 1.0,
            stop_count: 0,
            sample_rate,
        }
    }

    /// Layer gain.
    pub fn amp(&self) -> f32 {
        self.amp
    }

    /// Set the layer gain.
    pub fn set_amp(&mut self, amp: f32) {
        self.amp = amp;
    }

    /// Index of the selected slot.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Whether slot `index` is muted. Out-of-range indexes read as unmuted.
    pub fn is_muted(&self, index: usize) -> bool {
        self.unmuted.get(index).is_some_and(|&u| !u)
    }

    /// Slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&OscSlot> {
        self.slots.get(index)
    }

    /// Mutable slot at `index`.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut OscSlot> {
        self.slots.get_mut(index)
    }

    /// All slots.
    pub fn slots(&self) -> &[OscSlot; OSCS_PER_LAYER] {
        &self.slots
    }

    /// Held plus releasing voices across all slots.
    pub fn voice_count(&self) -> usize {
        self.slots.iter().map(OscSlot::voice_count).sum()
    }

    fn stop(&mut self) {
        self.stop_count = self.stop_count.saturating_add(1);
        for slot in &mut self.slots {
            slot.clear_voices();
        }
        if self.stop_count == 2 {
            let sample_rate = self.sample_rate;
            self.slots = core::array::from_fn(|_| OscSlot::new(sample_rate));
            #[cfg(feature = "tracing")]
            tracing::debug!("layer slots reset to defaults");
        }
    }

    fn addressed(&mut self, target: i32) -> Option<&mut OscSlot> {
        child_index(target, OSCS_PER_LAYER).map(|i| &mut self.slots[i])
    }

    /// Apply one control event routed to this layer.
    pub fn apply(&mut self, event: &ControlEvent) {
        let is_stop = event.action == Action::LayerRecord && event.target == 0;
        if !is_stop {
            self.stop_count = 0;
        }

        match event.action {
            Action::AddNote => {
                for (slot, &unmuted) in self.slots.iter_mut().zip(self.unmuted.iter()) {
                    if unmuted {
                        slot.apply(event);
                    }
                }
            }
            Action::RemoveNote => {
                for slot in &mut self.slots {
                    slot.apply(event);
                }
            }
            Action::LayerAmp => self.amp = event.value,
            Action::LayerRecord => {
                if is_stop {
                    self.stop();
                }
            }
            Action::OscSelect => match child_index(event.target, OSCS_PER_LAYER) {
                Some(i) => self.selected = i,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(slot = event.target, "slot selection out of range");
                }
            },
            Action::OscMute => {
                if let Some(i) = child_index(event.target, OSCS_PER_LAYER) {
                    self.unmuted[i] = !self.unmuted[i];
                }
            }
            Action::OscAmp | Action::FilterFreq => {
                if let Some(slot) = self.addressed(event.target) {
                    slot.apply(event);
                }
            }
            Action::OscPitch => {
                let index = if event.target == -1 {
                    Some(self.selected)
                } else {
                    child_index(event.target, OSCS_PER_LAYER)
                };
                if let Some(i) = index {
                    self.slots[i].apply(event);
                }
            }
            _ => self.slots[self.selected].apply(event),
        }
    }

    /// Render one buffer into `out`, overwriting it.
    ///
    /// The slot mix is scaled by `amp / 4`. With every slot muted the layer
    /// is silent and its slots are not advanced.
    pub fn next_buffer(&mut self, out: &mut Buffer) {
        out.fill(0.0);
        if !self.unmuted.iter().any(|&u| u) {
            return;
        }

        let mut scratch = [0.0; BUFFER_SAMPLES];
        for slot in &mut self.slots {
            slot.next_buffer(&mut scratch);
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += s;
            }
        }

        let gain = self.amp / OSCS_PER_LAYER as f32;
        for o in out.iter_mut() {
            *o *= gain;
        }
    }
}
