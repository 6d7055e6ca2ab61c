//! Control protocol: the `(action, target, value)` events the engine consumes.
//!
//! Input decoding (controllers, MIDI, a scripted session) happens outside the
//! engine. By the time an event reaches [`Synth::apply`](crate::Synth::apply)
//! its action is a typed [`Action`]; raw integer codes from a host are
//! converted with [`Action::from_code`], which rejects unknown codes.

use core::fmt;
use core::str::FromStr;
use strata_core::MIDI_TO_A4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Every control action the engine understands.
///
/// The integer codes returned by [`code`](Self::code) are the host wire
/// values and are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Action {
    /// Pure no-op.
    NoOp,
    /// Host power switch; ignored by the engine.
    Power,
    /// Master gain.
    SetVolume,
    /// Note-on. Target is the note number (semitones from A4).
    AddNote,
    /// Note-off. Target is the input code (note number + 57).
    RemoveNote,
    /// Select the layer that receives unaddressed events.
    LayerSelect,
    /// Gain of layer `target`.
    LayerAmp,
    /// Recorder transport. Target 0 stops and clears the selected layer.
    LayerRecord,
    /// Select the oscillator slot that receives unaddressed events.
    OscSelect,
    /// Toggle the mute flag of slot `target`.
    OscMute,
    /// Amplitude of slot `target`.
    OscAmp,
    /// Cycle the waveform of the selected slot.
    OscType,
    /// Shift the selected slot's octave by `target`.
    OscOctave,
    /// Target −1: semitone steps of the selected slot; otherwise cents of slot `target`.
    OscPitch,
    /// Attack time of the selected modulator.
    EnvAttack,
    /// Decay time of the selected modulator.
    EnvDecay,
    /// Sustain level of the selected modulator.
    EnvSustain,
    /// Release time of the selected modulator (and always the amplitude envelope).
    EnvRelease,
    /// Rate of the selected modulator's LFO.
    LfoSpeed,
    /// Percent-effect of the selected modulator's LFO.
    LfoAmp,
    /// Reserved; ignored.
    FilterType,
    /// Filter base value of slot `target`.
    FilterFreq,
    /// Reserved; ignored.
    FilterAmp,
    /// Reserved; ignored.
    FilterParam,
    /// Select which modulator envelope/LFO edits apply to.
    ModulatorSelect,
    /// Reserved; ignored.
    Unison,
}

impl Action {
    /// Every action, in code order.
    pub const ALL: [Action; 26] = [
        Action::NoOp,
        Action::Power,
        Action::SetVolume,
        Action::AddNote,
        Action::RemoveNote,
        Action::LayerSelect,
        Action::LayerAmp,
        Action::LayerRecord,
        Action::OscSelect,
        Action::OscMute,
        Action::OscAmp,
        Action::OscType,
        Action::OscOctave,
        Action::OscPitch,
        Action::EnvAttack,
        Action::EnvDecay,
        Action::EnvSustain,
        Action::EnvRelease,
        Action::LfoSpeed,
        Action::LfoAmp,
        Action::FilterType,
        Action::FilterFreq,
        Action::FilterAmp,
        Action::FilterParam,
        Action::ModulatorSelect,
        Action::Unison,
    ];

    /// Host wire code. `NoOp` is −1, the rest count up from `Power` = 0.
    pub fn code(self) -> i32 {
        match self {
            Action::NoOp => -1,
            Action::Power => 0,
            Action::SetVolume => 1,
            Action::AddNote => 2,
            Action::RemoveNote => 3,
            Action::LayerSelect => 4,
            Action::LayerAmp => 5,
            Action::LayerRecord => 6,
            Action::OscSelect => 7,
            Action::OscMute => 8,
            Action::OscAmp => 9,
            Action::OscType => 10,
            Action::OscOctave => 11,
            Action::OscPitch => 12,
            Action::EnvAttack => 13,
            Action::EnvDecay => 14,
            Action::EnvSustain => 15,
            Action::EnvRelease => 16,
            Action::LfoSpeed => 17,
            Action::LfoAmp => 18,
            Action::FilterType => 19,
            Action::FilterFreq => 20,
            Action::FilterAmp => 21,
            Action::FilterParam => 22,
            Action::ModulatorSelect => 23,
            Action::Unison => 24,
        }
    }

    /// Decode a host wire code. Unknown codes return `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.code() == code)
    }

    /// Stable snake_case name, as used in session files.
    pub fn name(self) -> &'static str {
        match self {
            Action::NoOp => "no_op",
            Action::Power => "power",
            Action::SetVolume => "set_volume",
            Action::AddNote => "add_note",
            Action::RemoveNote => "remove_note",
            Action::LayerSelect => "layer_select",
            Action::LayerAmp => "layer_amp",
            Action::LayerRecord => "layer_record",
            Action::OscSelect => "osc_select",
            Action::OscMute => "osc_mute",
            Action::OscAmp => "osc_amp",
            Action::OscType => "osc_type",
            Action::OscOctave => "osc_octave",
            Action::OscPitch => "osc_pitch",
            Action::EnvAttack => "env_attack",
            Action::EnvDecay => "env_decay",
            Action::EnvSustain => "env_sustain",
            Action::EnvRelease => "env_release",
            Action::LfoSpeed => "lfo_speed",
            Action::LfoAmp => "lfo_amp",
            Action::FilterType => "filter_type",
            Action::FilterFreq => "filter_freq",
            Action::FilterAmp => "filter_amp",
            Action::FilterParam => "filter_param",
            Action::ModulatorSelect => "modulator_select",
            Action::Unison => "unison",
        }
    }

    /// One-line description of what the target and value mean.
    pub fn description(self) -> &'static str {
        match self {
            Action::NoOp => "no-op",
            Action::Power => "host power switch (ignored by the engine)",
            Action::SetVolume => "value: master gain",
            Action::AddNote => "target: note number (0 = A4)",
            Action::RemoveNote => "target: input code (note number + 57)",
            Action::LayerSelect => "target: layer index",
            Action::LayerAmp => "target: layer index, value: gain",
            Action::LayerRecord => "target 0: stop and clear the selected layer",
            Action::OscSelect => "target: slot index",
            Action::OscMute => "target: slot index (toggles)",
            Action::OscAmp => "target: slot index, value: amplitude",
            Action::OscType => "cycle sine/square/saw/triangle",
            Action::OscOctave => "target: signed octave increment",
            Action::OscPitch => "target -1: steps (value), else slot index with cents (value)",
            Action::EnvAttack => "value: 0..1 mapped to 0..~4077 ms",
            Action::EnvDecay => "value: 0..1 mapped to 0..~4077 ms",
            Action::EnvSustain => "value: sustain level 0..1",
            Action::EnvRelease => "value: 0..1 mapped to 0..~4077 ms",
            Action::LfoSpeed => "value: rate in Hz",
            Action::LfoAmp => "value: percent effect",
            Action::FilterType => "reserved",
            Action::FilterFreq => "target: slot index, value: 0..1 filter amount",
            Action::FilterAmp => "reserved",
            Action::FilterParam => "reserved",
            Action::ModulatorSelect => "target: 0 amp, 1 pitch, 2 filter",
            Action::Unison => "reserved",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action name")]
pub struct ParseActionError;

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or(ParseActionError)
    }
}

/// The value an envelope or LFO edit is redirected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModTarget {
    /// Slot amplitude.
    Amp,
    /// Slot pitch.
    Pitch,
    /// Filter cutoff.
    Filter,
}

impl ModTarget {
    /// Target for a modulator-select index (0 amp, 1 pitch, 2 filter).
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(ModTarget::Amp),
            1 => Some(ModTarget::Pitch),
            2 => Some(ModTarget::Filter),
            _ => None,
        }
    }
}

/// One decoded control event.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlEvent {
    /// What to do.
    pub action: Action,
    /// Action-dependent index (note, input code, layer, slot, ...).
    pub target: i32,
    /// Action-dependent value, commonly 0..1.
    pub value: f32,
}

impl ControlEvent {
    /// Create an event.
    pub fn new(action: Action, target: i32, value: f32) -> Self {
        Self {
            action,
            target,
            value,
        }
    }

    /// Decode a raw host triple. Unknown action codes return `None`.
    pub fn from_raw(code: i32, target: i32, value: f32) -> Option<Self> {
        Action::from_code(code).map(|action| Self::new(action, target, value))
    }

    /// Note-on for `note` semitones from A4.
    pub fn note_on(note: i32) -> Self {
        Self::new(Action::AddNote, note, 0.0)
    }

    /// Note-off for a note started with [`note_on`](Self::note_on).
    pub fn note_off(note: i32) -> Self {
        Self::new(Action::RemoveNote, note.saturating_add(MIDI_TO_A4), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_code(action.code()), Some(action));
        }
        assert_eq!(Action::from_code(-1), Some(Action::NoOp));
        assert_eq!(Action::from_code(24), Some(Action::Unison));
        assert_eq!(Action::from_code(25), None);
        assert_eq!(Action::from_code(-2), None);
    }

    #[test]
    fn test_codes_are_dense() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.code(), i as i32 - 1);
        }
    }

    #[test]
    fn test_names_parse() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>(), Ok(action));
        }
        assert_eq!("lfo_amp".parse::<Action>(), Ok(Action::LfoAmp));
        assert_eq!("LfoAmp".parse::<Action>(), Err(ParseActionError));
    }

    #[test]
    fn test_parse_error_display() {
        let err = "explode".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "unknown action name");
        let _: &dyn core::error::Error = &err;
    }

    #[test]
    fn test_note_off_uses_input_code() {
        let on = ControlEvent::note_on(0);
        let off = ControlEvent::note_off(0);
        assert_eq!(on.target, 0);
        assert_eq!(off.target, 57);
        assert_eq!(off.action, Action::RemoveNote);
    }

    #[test]
    fn test_from_raw() {
        let ev = ControlEvent::from_raw(9, 2, 0.5);
        assert_eq!(ev, Some(ControlEvent::new(Action::OscAmp, 2, 0.5)));
        assert_eq!(ControlEvent::from_raw(99, 0, 0.0), None);
    }

    #[test]
    fn test_mod_target_index() {
        assert_eq!(ModTarget::from_index(0), Some(ModTarget::Amp));
        assert_eq!(ModTarget::from_index(2), Some(ModTarget::Filter));
        assert_eq!(ModTarget::from_index(3), None);
        assert_eq!(ModTarget::from_index(-1), None);
    }
}
