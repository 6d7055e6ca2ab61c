//! Engine-wide constants shared by every level of the mixing tree.

/// Number of samples produced per buffer.
pub const BUFFER_SAMPLES: usize = 256;

/// One buffer of mono samples.
pub type Buffer = [f32; BUFFER_SAMPLES];

/// Sample rate used when none is configured.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Offset between a controller input code and a note number.
///
/// Note number 0 is A4 (440 Hz); the controller sends it as input code 57.
pub const MIDI_TO_A4: i32 = 57;

/// Upper end of the filter cutoff range in Hz.
pub const MAX_CUTOFF: f32 = 10_000.0;

/// Added to every cutoff curve so the filter never fully closes.
pub const MIN_CUTOFF: f32 = 250.0;

/// Butterworth Q (1/√2) used by the voice low-pass filter.
pub const FILTER_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;
