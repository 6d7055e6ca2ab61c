//! Thread-safe front end: a control queue drained between buffers.
//!
//! The input side holds a [`ControlSender`] and never blocks. The audio side
//! owns the [`Engine`] and calls [`Engine::next_buffer`], which applies every
//! queued event before rendering, so no event is ever seen half-way through
//! a buffer.

use crate::control::ControlEvent;
use crate::synth::Synth;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use strata_core::Buffer;

/// Why an event could not be queued.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SendError {
    /// The queue is at capacity; the event was not queued.
    #[error("control queue is full")]
    Full(ControlEvent),
    /// The engine has been dropped.
    #[error("engine has been dropped")]
    Disconnected(ControlEvent),
}

impl SendError {
    /// The event that was not delivered.
    pub fn into_event(self) -> ControlEvent {
        match self {
            SendError::Full(event) | SendError::Disconnected(event) => event,
        }
    }
}

/// Producer half of the control queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ControlSender {
    tx: Sender<ControlEvent>,
}

impl ControlSender {
    /// Queue an event without blocking.
    pub fn send(&self, event: ControlEvent) -> Result<(), SendError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(ev) => SendError::Full(ev),
            TrySendError::Disconnected(ev) => SendError::Disconnected(ev),
        })
    }

    /// Number of events waiting to be applied.
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

/// A [`Synth`] behind a bounded control queue.
///
/// # Example
///
/// ```rust
/// use strata_synth::{ControlEvent, Engine};
/// use strata_core::BUFFER_SAMPLES;
///
/// let (mut engine, sender) = Engine::new(44_100, 64);
/// std::thread::spawn(move || {
///     sender.send(ControlEvent::note_on(0)).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// let mut out = [0.0; BUFFER_SAMPLES];
/// engine.next_buffer(&mut out);
/// assert_eq!(engine.synth().voice_count(), 4);
/// ```
#[derive(Debug)]
pub struct Engine {
    synth: Synth,
    rx: Receiver<ControlEvent>,
}

impl Engine {
    /// Create an engine with a fresh [`Synth`] and a queue of `capacity` events.
    pub fn new(sample_rate: u32, capacity: usize) -> (Self, ControlSender) {
        Self::with_synth(Synth::new(sample_rate), capacity)
    }

    /// Wrap an existing synth.
    pub fn with_synth(synth: Synth, capacity: usize) -> (Self, ControlSender) {
        let (tx, rx) = bounded(capacity);
        (Self { synth, rx }, ControlSender { tx })
    }

    /// The wrapped synth.
    pub fn synth(&self) -> &Synth {
        &self.synth
    }

    /// Mutable access for direct edits between buffers.
    pub fn synth_mut(&mut self) -> &mut Synth {
        &mut self.synth
    }

    /// Apply every queued event, in order. Returns how many were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.synth.apply(&event);
            applied += 1;
        }
        applied
    }

    /// Apply queued events, then render one buffer into `out`.
    pub fn next_buffer(&mut self, out: &mut Buffer) {
        self.drain_events();
        self.synth.next_buffer(out);
    }

    /// Unwrap the synth, dropping the queue.
    pub fn into_synth(self) -> Synth {
        self.synth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Action;
    use strata_core::BUFFER_SAMPLES;

    #[test]
    fn test_events_applied_before_render() {
        let (mut engine, sender) = Engine::new(44_100, 8);
        sender.send(ControlEvent::note_on(0)).unwrap();
        sender.send(ControlEvent::note_on(7)).unwrap();
        assert_eq!(sender.pending(), 2);

        let mut out = [0.0; BUFFER_SAMPLES];
        engine.next_buffer(&mut out);
        assert_eq!(sender.pending(), 0);
        assert_eq!(engine.synth().voice_count(), 8);
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_events_applied_in_order() {
        let (mut engine, sender) = Engine::new(44_100, 8);
        sender.send(ControlEvent::new(Action::SetVolume, 0, 0.2)).unwrap();
        sender.send(ControlEvent::new(Action::SetVolume, 0, 0.7)).unwrap();
        assert_eq!(engine.drain_events(), 2);
        assert_eq!(engine.synth().amp(), 0.7);
    }

    #[test]
    fn test_full_queue_rejects() {
        let (_engine, sender) = Engine::new(44_100, 1);
        sender.send(ControlEvent::note_on(0)).unwrap();
        let err = sender.send(ControlEvent::note_on(1)).unwrap_err();
        assert_eq!(err, SendError::Full(ControlEvent::note_on(1)));
        assert_eq!(err.into_event().target, 1);
    }

    #[test]
    fn test_disconnected_after_drop() {
        let (engine, sender) = Engine::new(44_100, 4);
        drop(engine);
        let err = sender.send(ControlEvent::note_on(0)).unwrap_err();
        assert!(matches!(err, SendError::Disconnected(_)));
        assert_eq!(err.to_string(), "engine has been dropped");
    }
}
