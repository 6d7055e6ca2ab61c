//! Criterion benchmarks for strata-synth
//!
//! One buffer is 256 samples; at 44.1 kHz the whole tree must render it in
//! under ~5.8 ms. `Synth/full_polyphony` is the worst case to compare
//! against that deadline.
//!
//! Run with: cargo bench -p strata-synth
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use strata_core::{BUFFER_SAMPLES, Waveform};
use strata_synth::{Action, ControlEvent, LAYERS, MAX_VOICES, Modulators, OscSlot, Synth, Voice};

const SAMPLE_RATE: u32 = 44_100;

fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("Voice");

    group.bench_function("default", |b| {
        let mut voice = Voice::new(0, Waveform::Saw, Modulators::new(SAMPLE_RATE), SAMPLE_RATE);
        let mut out = [0.0; BUFFER_SAMPLES];
        b.iter(|| {
            voice.render(&mut out, black_box(0.0));
            black_box(out[0])
        })
    });

    group.bench_function("modulated", |b| {
        let mut mods = Modulators::new(SAMPLE_RATE);
        mods.amp_env.set_attack_ms(2000);
        mods.amp_lfo.set_rate_hz(5.0);
        mods.amp_lfo.set_percent_effect(0.5);
        mods.pitch_lfo.set_rate_hz(3.0);
        mods.pitch_lfo.set_percent_effect(0.2);
        mods.filter_env.set_attack_ms(1000);
        mods.filter_env.set_target(5000.0);
        let mut voice = Voice::new(0, Waveform::Square, mods, SAMPLE_RATE);
        let mut out = [0.0; BUFFER_SAMPLES];
        b.iter(|| {
            voice.render(&mut out, black_box(2.0));
            black_box(out[0])
        })
    });

    group.finish();
}

fn bench_slot_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("OscSlot");

    for &voices in &[1usize, 4, 12, MAX_VOICES] {
        let mut slot = OscSlot::new(SAMPLE_RATE);
        for note in 0..voices as i32 {
            slot.note_on(note - 12);
        }
        group.bench_with_input(BenchmarkId::new("voices", voices), &voices, |b, _| {
            let mut out = [0.0; BUFFER_SAMPLES];
            b.iter(|| {
                slot.next_buffer(&mut out);
                black_box(out[0])
            })
        });
    }

    group.finish();
}

fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("Synth");

    group.bench_function("idle", |b| {
        let mut synth = Synth::new(SAMPLE_RATE);
        let mut out = [0.0; BUFFER_SAMPLES];
        b.iter(|| {
            synth.next_buffer(&mut out);
            black_box(out[0])
        })
    });

    // Every slot of every layer holds its maximum number of voices
    group.bench_function("full_polyphony", |b| {
        let mut synth = Synth::new(SAMPLE_RATE);
        for layer in 0..LAYERS as i32 {
            synth.apply(&ControlEvent::new(Action::LayerSelect, layer, 0.0));
            for note in 0..MAX_VOICES as i32 {
                synth.apply(&ControlEvent::note_on(note - 12));
            }
        }
        let mut out = [0.0; BUFFER_SAMPLES];
        b.iter(|| {
            synth.next_buffer(&mut out);
            black_box(out[0])
        })
    });

    group.bench_function("control_event", |b| {
        let mut synth = Synth::new(SAMPLE_RATE);
        b.iter(|| {
            synth.apply(black_box(&ControlEvent::note_on(0)));
            synth.apply(black_box(&ControlEvent::note_off(0)));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_voice, bench_slot_polyphony, bench_synth);
criterion_main!(benches);
