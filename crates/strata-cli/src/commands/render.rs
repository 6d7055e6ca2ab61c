//! Offline session rendering.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use strata_config::Session;
use strata_core::BUFFER_SAMPLES;
use strata_io::{WavSink, WavSpec};
use strata_synth::{Action, ControlEvent, Engine};

/// Log progress every this many buffers (~6 s at 44.1 kHz).
const PROGRESS_INTERVAL: u64 = 1024;

#[derive(Args)]
pub struct RenderArgs {
    /// Session file (TOML)
    #[arg(value_name = "SESSION")]
    session: PathBuf,

    /// Output WAV file
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Override the session's render length in buffers
    #[arg(long)]
    buffers: Option<u64>,

    /// Output bit depth (16 = PCM, 32 = float)
    #[arg(long, default_value_t = 16)]
    bits: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut session = Session::load(&args.session)
        .with_context(|| format!("loading {}", args.session.display()))?;
    if let Some(buffers) = args.buffers {
        session.buffers = buffers;
    }
    session
        .validate()
        .with_context(|| format!("invalid session {}", args.session.display()))?;

    let sample_rate = session.engine.sample_rate;
    tracing::info!(
        session = %session.name,
        sample_rate,
        buffers = session.buffers,
        events = session.events.len(),
        bits = args.bits,
        "rendering"
    );

    let spec = WavSpec::mono(sample_rate, args.bits);
    let mut sink = WavSink::create(&args.output, spec)
        .with_context(|| format!("creating {}", args.output.display()))?;

    // Room for the busiest tick plus the initial volume event
    let capacity = busiest_tick(&session) + 1;
    let (mut engine, sender) = Engine::new(sample_rate, capacity);
    sender.send(ControlEvent::new(
        Action::SetVolume,
        0,
        session.engine.master_volume,
    ))?;

    let mut out = [0.0; BUFFER_SAMPLES];
    for tick in 0..session.buffers {
        for scheduled in session.events_at(tick) {
            sender.send(scheduled.event())?;
        }
        engine.next_buffer(&mut out);
        sink.write_buffer(&out)
            .with_context(|| format!("writing {}", args.output.display()))?;

        if tick > 0 && tick % PROGRESS_INTERVAL == 0 {
            tracing::info!(tick, voices = engine.synth().voice_count(), "progress");
        }
    }

    let frames = sink.frames();
    let clipped = sink.clipped();
    sink.finalize()
        .with_context(|| format!("finalizing {}", args.output.display()))?;

    tracing::info!(
        frames,
        clipped,
        voices = engine.synth().voice_count(),
        "render complete"
    );
    println!(
        "Wrote {} samples ({:.2}s) to {}",
        frames,
        frames as f64 / f64::from(sample_rate),
        args.output.display()
    );
    Ok(())
}

/// Largest number of events scheduled on one tick.
fn busiest_tick(session: &Session) -> usize {
    session
        .events
        .chunk_by(|a, b| a.tick == b.tick)
        .map(<[_]>::len)
        .max()
        .unwrap_or(0)
}
