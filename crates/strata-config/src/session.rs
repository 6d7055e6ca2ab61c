//! Session file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::BUFFER_SAMPLES;
use strata_synth::{Action, ControlEvent};

use crate::error::ConfigError;
use crate::validation::{ValidationError, validate_session};

/// Engine settings for a rendered session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Sample rate in Hz (defaults to 44100).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Master gain applied before the first buffer (defaults to 1.0).
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,
}

fn default_sample_rate() -> u32 {
    44_100
}

fn default_master_volume() -> f32 {
    1.0
}

fn default_buffers() -> u64 {
    // ~1 s at 44.1 kHz
    172
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            master_volume: default_master_volume(),
        }
    }
}

/// One control event pinned to a buffer index.
///
/// The event is applied before buffer `tick` is rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEvent {
    /// Buffer index at which the event fires.
    pub tick: u64,
    /// Action name, e.g. `"add_note"`.
    pub action: Action,
    /// Action-dependent index.
    #[serde(default)]
    pub target: i32,
    /// Action-dependent value.
    #[serde(default)]
    pub value: f32,
}

impl ScheduledEvent {
    /// Create a scheduled event.
    pub fn new(tick: u64, action: Action, target: i32, value: f32) -> Self {
        Self {
            tick,
            action,
            target,
            value,
        }
    }

    /// The control event to hand to the synth.
    pub fn event(&self) -> ControlEvent {
        ControlEvent::new(self.action, self.target, self.value)
    }
}

/// A scripted performance: engine settings plus a tick-ordered event list.
///
/// # TOML Format
///
/// ```toml
/// name = "A4 pluck"
/// buffers = 200
///
/// [engine]
/// sample_rate = 44100
/// master_volume = 1.0
///
/// [[events]]
/// tick = 0
/// action = "env_release"
/// value = 0.3
///
/// [[events]]
/// tick = 0
/// action = "add_note"
/// target = 0
///
/// [[events]]
/// tick = 40
/// action = "remove_note"
/// target = 57
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Name of the session.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of buffers to render.
    #[serde(default = "default_buffers")]
    pub buffers: u64,

    /// Engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Scheduled events, in non-decreasing tick order.
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
}

impl Session {
    /// Create an empty session with default engine settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            buffers: default_buffers(),
            engine: EngineConfig::default(),
            events: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the render length in buffers.
    pub fn with_buffers(mut self, buffers: u64) -> Self {
        self.buffers = buffers;
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.engine.sample_rate = sample_rate;
        self
    }

    /// Append an event.
    pub fn with_event(mut self, event: ScheduledEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Load a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a session from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the session to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the session to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the session; see [`validate_session`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_session(self)
    }

    /// Events scheduled for buffer `tick`, in file order.
    ///
    /// Assumes the list is tick-ordered.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &ScheduledEvent> {
        let start = self.events.partition_point(|e| e.tick < tick);
        self.events[start..].iter().take_while(move |e| e.tick == tick)
    }

    /// Total rendered length in samples.
    pub fn total_samples(&self) -> u64 {
        self.buffers.saturating_mul(BUFFER_SAMPLES as u64)
    }
}
