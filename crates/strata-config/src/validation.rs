//! Session validation.
//!
//! A session that passes [`validate_session`] renders without surprises:
//! the sample rate is one a WAV writer and the filter can handle, every
//! number is finite, and every event fires inside the render window in
//! the order it is listed.
//!
//! # Example
//!
//! ```rust
//! use strata_config::{Session, ScheduledEvent, ValidationError, validate_session};
//! use strata_synth::Action;
//!
//! let session = Session::new("late")
//!     .with_buffers(10)
//!     .with_event(ScheduledEvent::new(12, Action::AddNote, 0, 0.0));
//!
//! assert!(matches!(
//!     validate_session(&session),
//!     Err(ValidationError::TickOutOfRange { index: 0, .. })
//! ));
//! ```

use thiserror::Error;

use crate::session::Session;

/// Lowest accepted sample rate in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Sample rate outside the supported range.
    #[error("sample rate {0} Hz outside 8000..=192000")]
    SampleRate(u32),

    /// Master volume is NaN or infinite.
    #[error("master volume {0} is not finite")]
    MasterVolume(f32),

    /// Event value is NaN or infinite.
    #[error("event {index}: value {value} is not finite")]
    NonFiniteValue {
        /// Position in the event list.
        index: usize,
        /// The offending value.
        value: f32,
    },

    /// Event fires at or after the last rendered buffer.
    #[error("event {index}: tick {tick} is beyond the {buffers}-buffer render")]
    TickOutOfRange {
        /// Position in the event list.
        index: usize,
        /// Requested tick.
        tick: u64,
        /// Render length in buffers.
        buffers: u64,
    },

    /// Event tick is earlier than the one before it.
    #[error("event {index}: tick {tick} comes before previous tick {previous}")]
    OutOfOrder {
        /// Position in the event list.
        index: usize,
        /// Tick of this event.
        tick: u64,
        /// Tick of the preceding event.
        previous: u64,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check a session, collecting every problem.
///
/// Returns the lone error directly, or [`ValidationError::Multiple`] when
/// there is more than one.
pub fn validate_session(session: &Session) -> ValidationResult<()> {
    let mut errors = Vec::new();

    let rate = session.engine.sample_rate;
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) {
        errors.push(ValidationError::SampleRate(rate));
    }

    let volume = session.engine.master_volume;
    if !volume.is_finite() {
        errors.push(ValidationError::MasterVolume(volume));
    }

    let mut previous = 0;
    for (index, event) in session.events.iter().enumerate() {
        if !event.value.is_finite() {
            errors.push(ValidationError::NonFiniteValue {
                index,
                value: event.value,
            });
        }
        if event.tick >= session.buffers {
            errors.push(ValidationError::TickOutOfRange {
                index,
                tick: event.tick,
                buffers: session.buffers,
            });
        }
        if event.tick < previous {
            errors.push(ValidationError::OutOfOrder {
                index,
                tick: event.tick,
                previous,
            });
        }
        previous = event.tick;
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
