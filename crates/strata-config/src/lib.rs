//! Session files for the strata synthesizer.
//!
//! A session is a TOML document that scripts a performance: engine
//! settings, a render length in buffers, and a list of control events
//! pinned to buffer ticks. The CLI renders sessions offline to WAV.
//!
//! # Example
//!
//! ```rust
//! use strata_config::Session;
//! use strata_synth::Action;
//!
//! let session = Session::from_toml(r#"
//!     name = "chord"
//!     buffers = 100
//!
//!     [[events]]
//!     tick = 0
//!     action = "add_note"
//!     target = 0
//!
//!     [[events]]
//!     tick = 0
//!     action = "add_note"
//!     target = 4
//! "#).unwrap();
//!
//! assert_eq!(session.events[1].action, Action::AddNote);
//! session.validate().unwrap();
//! ```

pub mod error;
pub mod session;
pub mod validation;

pub use error::ConfigError;
pub use session::{EngineConfig, ScheduledEvent, Session};
pub use validation::{
    MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, ValidationError, ValidationResult, validate_session,
};
