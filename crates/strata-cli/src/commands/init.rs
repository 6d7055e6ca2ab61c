//! Starter session command.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use strata_config::{ScheduledEvent, Session};
use strata_core::MIDI_TO_A4;
use strata_synth::Action;

#[derive(Args)]
pub struct InitArgs {
    /// Where to write the session file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    starter_session()
        .save(&args.output)
        .with_context(|| format!("saving {}", args.output.display()))?;
    println!("Wrote starter session to {}", args.output.display());
    Ok(())
}

/// An A major triad with a soft attack and a long release, held for ~1 s.
fn starter_session() -> Session {
    let chord = [0, 4, 7];
    let mut session = Session::new("starter")
        .with_description("A major triad, held then released")
        .with_buffers(300)
        .with_event(ScheduledEvent::new(0, Action::EnvAttack, 0, 0.3))
        .with_event(ScheduledEvent::new(0, Action::EnvRelease, 0, 0.5));

    for note in chord {
        session = session.with_event(ScheduledEvent::new(0, Action::AddNote, note, 0.0));
    }
    for note in chord {
        session = session.with_event(ScheduledEvent::new(
            172,
            Action::RemoveNote,
            note + MIDI_TO_A4,
            0.0,
        ));
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_session_is_valid() {
        let session = starter_session();
        assert_eq!(session.validate(), Ok(()));
        assert_eq!(session.events.len(), 8);
    }
}
