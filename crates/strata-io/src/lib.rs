//! Audio file output for the strata synthesizer.
//!
//! - **Whole-file I/O**: [`read_wav`] and [`write_wav`]
//! - **Streaming output**: [`WavSink`] appends rendered buffers as they
//!   come out of the engine, so long renders never sit in memory
//!
//! Integer output clamps each sample to [-1, 1] and scales by the
//! positive full-scale value (32767 for 16-bit). Float output is written
//! unclamped.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata_io::{WavSink, WavSpec};
//! use strata_synth::{ControlEvent, Synth};
//!
//! let mut synth = Synth::new(44_100);
//! synth.apply(&ControlEvent::note_on(0));
//!
//! let mut sink = WavSink::create("a4.wav", WavSpec::mono(44_100, 16))?;
//! let mut out = [0.0; strata_core::BUFFER_SAMPLES];
//! for _ in 0..172 {
//!     synth.next_buffer(&mut out);
//!     sink.write_buffer(&out)?;
//! }
//! sink.finalize()?;
//! ```

mod wav;

pub use wav::{WavFormat, WavInfo, WavSink, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested bit depth is not supported.
    #[error("Unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
