//! A single sounding note.
//!
//! A [`Voice`] owns private copies of its slot's modulator templates, taken
//! at note-on. Later edits on the slot never reach it, with one exception:
//! the slot's pitch value is passed in live on every
//! [`render`](Voice::render) call, so pitch bends affect held notes.

use strata_core::{
    BUFFER_SAMPLES, Buffer, EnvelopeTemplate, LfoTemplate, LowPassState, MAX_CUTOFF, MIN_CUTOFF,
    OscillatorState, Waveform,
};

/// The five modulator templates a voice runs.
///
/// An oscillator slot keeps one set as the master copy and clones it into
/// every new voice.
#[derive(Debug, Clone, PartialEq)]
pub struct Modulators {
    /// Amplitude envelope; its target is the slot amplitude.
    pub amp_env: EnvelopeTemplate,
    /// Amplitude LFO.
    pub amp_lfo: LfoTemplate,
    /// Pitch envelope; a unit-target shape that scales the shared pitch.
    pub pitch_env: EnvelopeTemplate,
    /// Pitch LFO.
    pub pitch_lfo: LfoTemplate,
    /// Filter envelope; its target is the slot filter value.
    pub filter_env: EnvelopeTemplate,
}

impl Modulators {
    /// Default set: flat envelopes (sustain 1.0) and bypassed LFOs.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            amp_env: EnvelopeTemplate::new(sample_rate),
            amp_lfo: LfoTemplate::new(sample_rate),
            pitch_env: EnvelopeTemplate::new(sample_rate),
            pitch_lfo: LfoTemplate::new(sample_rate),
            filter_env: EnvelopeTemplate::new(sample_rate),
        }
    }
}

/// One note in an oscillator slot.
///
/// Lifecycle: active, then releasing after [`start_release`](Self::start_release),
/// then done once a releasing buffer ends with the amplitude envelope at
/// exactly zero. The owning slot reclaims done voices.
///
/// # Example
///
/// ```rust
/// use strata_synth::{Modulators, Voice};
/// use strata_core::{Waveform, BUFFER_SAMPLES};
///
/// let mods = Modulators::new(44_100);
/// let mut voice = Voice::new(0, Waveform::Sine, mods, 44_100);
///
/// let mut out = [0.0; BUFFER_SAMPLES];
/// voice.render(&mut out, 0.0);
///
/// // Zero release time: the first releasing buffer finishes the voice
/// voice.start_release();
/// voice.render(&mut out, 0.0);
/// assert!(voice.is_done());
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    mods: Modulators,
    filter: LowPassState,
    osc: OscillatorState,
    releasing: bool,
    done: bool,
    sample_rate: u32,
}

impl Voice {
    /// Start a voice for `note` (semitones from A4) with its own modulators.
    pub fn new(note: i32, waveform: Waveform, mods: Modulators, sample_rate: u32) -> Self {
        Self {
            mods,
            filter: LowPassState::new(),
            osc: OscillatorState::new(waveform, note, sample_rate),
            releasing: false,
            done: false,
            sample_rate,
        }
    }

    /// Note number, in semitones from A4.
    pub fn note(&self) -> i32 {
        self.osc.note()
    }

    /// The voice's private modulator copies.
    pub fn modulators(&self) -> &Modulators {
        &self.mods
    }

    /// Whether note-off has been received.
    pub fn is_releasing(&self) -> bool {
        self.releasing
    }

    /// Whether the release has finished and the voice can be reclaimed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Enter the release segment. All three envelopes restart at position 0.
    pub fn start_release(&mut self) {
        self.releasing = true;
        self.mods.amp_env.start_release();
        self.mods.pitch_env.start_release();
        self.mods.filter_env.start_release();
    }

    /// Render one buffer into `out`.
    ///
    /// `shared_pitch` is the owning slot's current pitch in semitones.
    pub fn render(&mut self, out: &mut Buffer, shared_pitch: f32) {
        let mut amp_shape = [0.0; BUFFER_SAMPLES];
        let mut pitch_shape = [0.0; BUFFER_SAMPLES];
        self.mods.amp_env.render(&mut amp_shape);
        self.mods.pitch_env.render(&mut pitch_shape);

        let mut amp_lfo = [1.0; BUFFER_SAMPLES];
        let mut pitch_lfo = [1.0; BUFFER_SAMPLES];
        self.mods.amp_lfo.render(&mut amp_lfo);
        self.mods.pitch_lfo.render(&mut pitch_lfo);

        let mut cutoff = [0.0; BUFFER_SAMPLES];
        self.mods.filter_env.render(&mut cutoff);

        // Completion is judged on the envelope alone, not the LFO product
        let env_finished = amp_shape[BUFFER_SAMPLES - 1] == 0.0;

        for i in 0..BUFFER_SAMPLES {
            cutoff[i] = MAX_CUTOFF - cutoff[i] + MIN_CUTOFF;
            amp_shape[i] *= amp_lfo[i];
            pitch_shape[i] *= pitch_lfo[i];
        }

        self.osc.render(out, &amp_shape, &pitch_shape, shared_pitch);
        self.filter.process(out, &cutoff, self.sample_rate);

        if self.releasing && env_finished {
            self.done = true;
        }
    }
}
