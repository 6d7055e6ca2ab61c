//! Oscillator slot: a bounded voice pool plus the master modulator settings.
//!
//! Voices live in two fixed-capacity tables. Held notes occupy the live
//! table (first-fit, no stealing); note-off moves a voice into the release
//! tail table, again first-fit. Both tables are allocated once at
//! construction so note-on, note-off and rendering never allocate.

use crate::control::{Action, ControlEvent, ModTarget};
use crate::voice::{Modulators, Voice};
use strata_core::{BUFFER_SAMPLES, Buffer, MAX_CUTOFF, MIDI_TO_A4, Waveform, control_to_ms};

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

/// Live (held) voices per slot.
pub const MAX_VOICES: usize = 25;

/// Voices per slot that can play their release tail at once.
pub const MAX_RELEASING: usize = 10;

/// Normalization floor: a slot is never louder than four full voices.
const MIN_VOICE_DIVISOR: usize = 4;

/// One timbral unit of a layer.
///
/// # Example
///
/// ```rust
/// use strata_synth::{Action, ControlEvent, OscSlot};
/// use strata_core::BUFFER_SAMPLES;
///
/// let mut slot = OscSlot::new(44_100);
/// slot.apply(&ControlEvent::note_on(0));
/// assert_eq!(slot.live_count(), 1);
///
/// let mut out = [0.0; BUFFER_SAMPLES];
/// slot.next_buffer(&mut out);
///
/// slot.apply(&ControlEvent::note_off(0));
/// assert_eq!(slot.live_count(), 0);
/// assert_eq!(slot.releasing_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct OscSlot {
    voices: Box<[Option<Voice>; MAX_VOICES]>,
    /// Input code of the voice in the same live-table position
    input_map: [Option<i32>; MAX_VOICES],
    releasing: Box<[Option<Voice>; MAX_RELEASING]>,

    waveform: Waveform,
    selected_mod: Option<ModTarget>,

    amp: f32,
    octave: i32,
    steps: i32,
    cents: f32,
    /// `octave · 12 + steps + cents`, read live by every voice
    pitch: f32,
    filter: f32,

    master: Modulators,
    sample_rate: u32,
}

impl OscSlot {
    /// Create a slot with factory defaults and no voices.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            voices: Box::new(core::array::from_fn(|_| None)),
            input_map: [None; MAX_VOICES],
            releasing: Box::new(core::array::from_fn(|_| None)),
            waveform: Waveform::Sine,
            selected_mod: Some(ModTarget::Amp),
            amp: 1.0,
            octave: 0,
            steps: 0,
            cents: 0.0,
            pitch: 0.0,
            filter: 0.0,
            master: Modulators::new(sample_rate),
            sample_rate,
        }
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Modulator that envelope and LFO edits apply to, if any.
    pub fn selected_mod(&self) -> Option<ModTarget> {
        self.selected_mod
    }

    /// Slot amplitude, the amplitude envelope's target.
    pub fn amp(&self) -> f32 {
        self.amp
    }

    /// Combined pitch offset in semitones.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Filter base value, the filter envelope's target.
    pub fn filter(&self) -> f32 {
        self.filter
    }

    /// Master templates new voices clone.
    pub fn modulators(&self) -> &Modulators {
        &self.master
    }

    /// Number of held voices.
    pub fn live_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_some()).count()
    }

    /// Number of voices playing their release tail.
    pub fn releasing_count(&self) -> usize {
        self.releasing.iter().filter(|v| v.is_some()).count()
    }

    /// Held plus releasing voices.
    pub fn voice_count(&self) -> usize {
        self.live_count() + self.releasing_count()
    }

    /// Iterate over held voices.
    pub fn live_voices(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter().flatten()
    }

    /// Iterate over releasing voices.
    pub fn releasing_voices(&self) -> impl Iterator<Item = &Voice> {
        self.releasing.iter().flatten()
    }

    /// Start a voice for `note` in the first free live position.
    ///
    /// Returns `false` when all [`MAX_VOICES`] positions are held.
    pub fn note_on(&mut self, note: i32) -> bool {
        let Some(pos) = self.voices.iter().position(Option::is_none) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(note, "note-on dropped: all {MAX_VOICES} voices held");
            return false;
        };

        let mut mods = self.master.clone();
        mods.amp_env.set_target(self.amp);
        mods.pitch_env.set_target(1.0);
        mods.filter_env.set_target(self.filter);

        self.voices[pos] = Some(Voice::new(note, self.waveform, mods, self.sample_rate));
        self.input_map[pos] = Some(note.saturating_add(MIDI_TO_A4));
        true
    }

    /// Release the held voice started for `input_code`.
    ///
    /// The voice moves to the first free release position; if none is free
    /// its tail is dropped. Returns `false` when no voice matched.
    pub fn note_off(&mut self, input_code: i32) -> bool {
        let Some(pos) = self.input_map.iter().position(|&c| c == Some(input_code)) else {
            return false;
        };

        self.input_map[pos] = None;
        let Some(mut voice) = self.voices[pos].take() else {
            return false;
        };
        voice.start_release();

        match self.releasing.iter_mut().find(|v| v.is_none()) {
            Some(free) => *free = Some(voice),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    input_code,
                    "release tail dropped: all {MAX_RELEASING} tail slots busy"
                );
            }
        }
        true
    }

    /// Drop every held and releasing voice immediately.
    pub fn clear_voices(&mut self) {
        self.voices.iter_mut().for_each(|v| *v = None);
        self.releasing.iter_mut().for_each(|v| *v = None);
        self.input_map = [None; MAX_VOICES];
    }

    /// Set the slot amplitude.
    pub fn set_amp(&mut self, amp: f32) {
        self.amp = amp;
    }

    /// Set the waveform used by voices started from now on.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Shift the octave by `delta` octaves.
    pub fn shift_octave(&mut self, delta: i32) {
        self.octave = self.octave.saturating_add(delta);
        self.update_pitch();
    }

    /// Set the semitone offset.
    pub fn set_steps(&mut self, steps: i32) {
        self.steps = steps;
        self.update_pitch();
    }

    /// Set the fine offset, in cents.
    pub fn set_cents(&mut self, cents: f32) {
        self.cents = cents / 100.0;
        self.update_pitch();
    }

    fn update_pitch(&mut self) {
        self.pitch = self.octave.saturating_mul(12).saturating_add(self.steps) as f32 + self.cents;
    }

    /// Set the filter base value from a 0..1 control (1.0 opens fully).
    pub fn set_filter_amount(&mut self, value: f32) {
        self.filter = MAX_CUTOFF - value * MAX_CUTOFF;
    }

    /// Select which modulator envelope/LFO edits apply to.
    ///
    /// An invalid index clears the selection and later edits are ignored.
    pub fn select_mod(&mut self, index: i32) {
        self.selected_mod = ModTarget::from_index(index);
        if self.selected_mod.is_none() {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, "modulator selection cleared");
        }
    }

    fn edit_envelope(&mut self, action: Action, value: f32) {
        let Some(target) = self.selected_mod else {
            return;
        };
        let env = match target {
            ModTarget::Amp => &mut self.master.amp_env,
            ModTarget::Pitch => &mut self.master.pitch_env,
            // The filter envelope has no decay or sustain stage
            ModTarget::Filter if matches!(action, Action::EnvDecay | Action::EnvSustain) => {
                return;
            }
            ModTarget::Filter => &mut self.master.filter_env,
        };

        match action {
            Action::EnvAttack => env.set_attack_ms(control_to_ms(value)),
            Action::EnvDecay => env.set_decay_ms(control_to_ms(value)),
            Action::EnvSustain => env.set_sustain(value),
            Action::EnvRelease => {
                let ms = control_to_ms(value);
                env.set_release_ms(ms);
                self.master.amp_env.set_release_ms(ms);
            }
            _ => {}
        }
    }

    fn edit_lfo(&mut self, action: Action, value: f32) {
        let lfo = match self.selected_mod {
            Some(ModTarget::Amp) => &mut self.master.amp_lfo,
            Some(ModTarget::Pitch) => &mut self.master.pitch_lfo,
            Some(ModTarget::Filter) | None => return,
        };

        match action {
            Action::LfoAmp => lfo.set_percent_effect(value),
            Action::LfoSpeed => lfo.set_rate_hz(value),
            _ => {}
        }
    }

    /// Apply one control event routed to this slot.
    pub fn apply(&mut self, event: &ControlEvent) {
        let ControlEvent {
            action,
            target,
            value,
        } = *event;

        match action {
            Action::AddNote => {
                self.note_on(target);
            }
            Action::RemoveNote => {
                self.note_off(target);
            }
            Action::OscType => self.waveform = self.waveform.next(),
            Action::OscAmp => self.set_amp(value),
            Action::OscOctave => self.shift_octave(target),
            Action::OscPitch => {
                if target == -1 {
                    self.set_steps(value as i32);
                } else {
                    self.set_cents(value);
                }
            }
            Action::ModulatorSelect => self.select_mod(target),
            Action::EnvAttack | Action::EnvDecay | Action::EnvSustain | Action::EnvRelease => {
                self.edit_envelope(action, value);
            }
            Action::LfoSpeed | Action::LfoAmp => self.edit_lfo(action, value),
            Action::FilterFreq => self.set_filter_amount(value),
            _ => {}
        }
    }

    /// Render one buffer of every voice into `out`, overwriting it.
    ///
    /// Finished release tails are reclaimed first. The mix is weighted by
    /// `sustain / max(4, held voices)`; releasing voices are summed but not
    /// counted.
    pub fn next_buffer(&mut self, out: &mut Buffer) {
        out.fill(0.0);

        for tail in self.releasing.iter_mut() {
            if tail.as_ref().is_some_and(Voice::is_done) {
                *tail = None;
            }
        }

        let sustain = self.master.amp_env.sustain();
        let live = self.live_count();
        if live + self.releasing_count() == 0 || sustain == 0.0 {
            return;
        }

        let pitch = self.pitch;
        let mut scratch = [0.0; BUFFER_SAMPLES];
        for voice in self
            .voices
            .iter_mut()
            .chain(self.releasing.iter_mut())
            .flatten()
        {
            voice.render(&mut scratch, pitch);
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += s;
            }
        }

        let weight = sustain / live.max(MIN_VOICE_DIVISOR) as f32;
        for o in out.iter_mut() {
            *o *= weight;
        }
    }
}
