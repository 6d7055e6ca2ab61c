//! Session validation command.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use strata_config::{Session, ValidationError};

#[derive(Args)]
pub struct CheckArgs {
    /// Session files to check
    #[arg(value_name = "SESSION", required = true)]
    sessions: Vec<PathBuf>,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let mut failed = 0;

    for path in &args.sessions {
        let session =
            Session::load(path).with_context(|| format!("loading {}", path.display()))?;

        match session.validate() {
            Ok(()) => println!(
                "{}: ok ({} events over {} buffers at {} Hz)",
                path.display(),
                session.events.len(),
                session.buffers,
                session.engine.sample_rate
            ),
            Err(ValidationError::Multiple(errors)) => {
                failed += 1;
                println!("{}: {} problems", path.display(), errors.len());
                for err in errors {
                    println!("  {err}");
                }
            }
            Err(err) => {
                failed += 1;
                println!("{}: {err}", path.display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} sessions failed validation", args.sessions.len());
    }
    Ok(())
}
