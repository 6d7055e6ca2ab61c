//! Integration tests for strata-synth crate.
//!
//! Tests drive a whole [`Synth`] through the control protocol and inspect
//! the rendered buffers: pitch, loudness stability, release behaviour,
//! capacity limits, and live pitch versus cloned templates.

use strata_synth::{Action, ControlEvent, MAX_RELEASING, MAX_VOICES, Synth};
use strata_core::{BUFFER_SAMPLES, Buffer, MIDI_TO_A4};

const SR: u32 = 44_100;

fn ev(action: Action, target: i32, value: f32) -> ControlEvent {
    ControlEvent::new(action, target, value)
}

fn render(synth: &mut Synth, buffers: usize) -> Vec<Buffer> {
    (0..buffers)
        .map(|_| {
            let mut out = [0.0; BUFFER_SAMPLES];
            synth.next_buffer(&mut out);
            out
        })
        .collect()
}

fn peak(buf: &Buffer) -> f32 {
    buf.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

fn rms(buf: &Buffer) -> f32 {
    (buf.iter().map(|s| s * s).sum::<f32>() / BUFFER_SAMPLES as f32).sqrt()
}

fn rising_crossings(buffers: &[Buffer]) -> usize {
    let samples: Vec<f32> = buffers.iter().flatten().copied().collect();
    samples
        .windows(2)
        .filter(|w| w[0] < 0.0 && w[1] >= 0.0)
        .count()
}

/// Synth with only slot 0 of layer 0 unmuted.
fn single_slot_synth() -> Synth {
    let mut synth = Synth::new(SR);
    for slot in 1..4 {
        synth.apply(&ev(Action::OscMute, slot, 0.0));
    }
    synth
}

// ---------------------------------------------------------------------------
// 1. End-to-end tone
// ---------------------------------------------------------------------------

#[test]
fn a4_renders_at_440_hz() {
    let mut synth = Synth::new(SR);
    synth.apply(&ControlEvent::note_on(0));

    let buffers = render(&mut synth, 102);
    // 100 buffers = 25600 samples ≈ 255.4 cycles of 440 Hz
    let crossings = rising_crossings(&buffers[2..]);
    assert!(
        (254..=257).contains(&crossings),
        "expected ~255 cycles, got {crossings}"
    );
}

#[test]
fn sustained_note_has_stable_rms() {
    let mut synth = Synth::new(SR);
    synth.apply(&ControlEvent::note_on(0));

    let buffers = render(&mut synth, 50);
    let levels: Vec<f32> = buffers[2..].iter().map(rms).collect();
    let mean = levels.iter().sum::<f32>() / levels.len() as f32;

    // Four slots at 1/4 weight, then layer /4 and master /4: a 1/16 sine
    let expected = (1.0 / 16.0) / 2.0f32.sqrt();
    assert!((mean - expected).abs() / expected < 0.05, "mean rms {mean}");

    for level in &levels {
        assert!(
            (level - mean).abs() / mean < 0.05,
            "rms {level} deviates from mean {mean}"
        );
    }
}

#[test]
fn silent_until_note_on() {
    let mut synth = Synth::new(SR);
    for buf in render(&mut synth, 4) {
        assert!(buf.iter().all(|&s| s == 0.0));
    }
}

// ---------------------------------------------------------------------------
// 2. Release
// ---------------------------------------------------------------------------

#[test]
fn release_decays_monotonically_then_disappears() {
    let mut synth = single_slot_synth();
    // 0.2 maps to 192 ms = 33 buffers of release
    synth.apply(&ev(Action::EnvRelease, 0, 0.2));
    synth.apply(&ControlEvent::note_on(0));
    render(&mut synth, 8);

    synth.apply(&ControlEvent::note_off(0));
    let mut peaks = Vec::new();
    let mut out = [0.0; BUFFER_SAMPLES];
    loop {
        synth.next_buffer(&mut out);
        if synth.voice_count() == 0 {
            break;
        }
        peaks.push(peak(&out));
        assert!(peaks.len() < 100, "voice never finished releasing");
    }

    assert!(
        (30..=36).contains(&peaks.len()),
        "release lasted {} buffers",
        peaks.len()
    );

    for pair in peaks.windows(2) {
        assert!(pair[1] < pair[0], "peak rose during release: {pair:?}");
    }

    // The buffer that reclaimed the voice, and every one after, is silent
    assert!(out.iter().all(|&s| s == 0.0));
    for buf in render(&mut synth, 4) {
        assert!(buf.iter().all(|&s| s == 0.0));
    }
}

#[test]
fn reclaimed_voice_leaves_exactly_the_remaining_mix() {
    // Both synths hold a note on layer 1; only `a` plays and releases one on layer 0
    let mut a = Synth::new(SR);
    let mut b = Synth::new(SR);
    for synth in [&mut a, &mut b] {
        synth.apply(&ev(Action::LayerSelect, 1, 0.0));
        synth.apply(&ControlEvent::note_on(5));
        synth.apply(&ev(Action::LayerSelect, 0, 0.0));
    }

    a.apply(&ControlEvent::note_on(0));
    render(&mut a, 4);
    render(&mut b, 4);
    a.apply(&ControlEvent::note_off(0));

    // Zero release: done during the first buffer, reclaimed on the second
    render(&mut a, 2);
    render(&mut b, 2);
    assert_eq!(a.voice_count(), b.voice_count());

    for (x, y) in render(&mut a, 4).iter().zip(render(&mut b, 4).iter()) {
        assert_eq!(x, y);
    }
}

#[test]
fn muted_slots_still_release() {
    let mut synth = Synth::new(SR);
    synth.apply(&ControlEvent::note_on(0));
    synth.apply(&ev(Action::OscMute, 2, 0.0));
    synth.apply(&ControlEvent::note_off(0));
    render(&mut synth, 2);
    assert_eq!(synth.voice_count(), 0);
}

// ---------------------------------------------------------------------------
// 3. Capacity limits
// ---------------------------------------------------------------------------

#[test]
fn twenty_sixth_note_is_dropped() {
    let mut synth = single_slot_synth();
    for note in 0..=MAX_VOICES as i32 {
        synth.apply(&ControlEvent::note_on(note));
    }
    let slot = synth.layer(0).unwrap().slot(0).unwrap();
    assert_eq!(slot.live_count(), MAX_VOICES);
    assert!(slot.live_voices().all(|v| v.note() < MAX_VOICES as i32));

    // Releasing the dropped note finds nothing
    synth.apply(&ControlEvent::note_off(MAX_VOICES as i32));
    let slot = synth.layer(0).unwrap().slot(0).unwrap();
    assert_eq!(slot.live_count(), MAX_VOICES);

    let mut out = [0.0; BUFFER_SAMPLES];
    synth.next_buffer(&mut out);
    assert!(out.iter().all(|s| s.is_finite()));
}

#[test]
fn release_tail_overflow_abandons_voices() {
    let mut synth = single_slot_synth();
    synth.apply(&ev(Action::EnvRelease, 0, 1.0));
    for note in 0..15 {
        synth.apply(&ControlEvent::note_on(note));
    }
    for note in 0..15 {
        synth.apply(&ev(Action::RemoveNote, note + MIDI_TO_A4, 0.0));
    }

    let slot = synth.layer(0).unwrap().slot(0).unwrap();
    assert_eq!(slot.live_count(), 0);
    assert_eq!(slot.releasing_count(), MAX_RELEASING);

    // Abandoned notes are gone: the same input codes can be played again
    for note in 0..15 {
        synth.apply(&ControlEvent::note_on(note));
    }
    let slot = synth.layer(0).unwrap().slot(0).unwrap();
    assert_eq!(slot.live_count(), 15);
}

// ---------------------------------------------------------------------------
// 4. Live pitch versus cloned templates
// ---------------------------------------------------------------------------

#[test]
fn pitch_bend_reaches_held_voices() {
    let mut bent = single_slot_synth();
    let mut plain = single_slot_synth();
    bent.apply(&ControlEvent::note_on(0));
    plain.apply(&ControlEvent::note_on(0));
    render(&mut bent, 2);
    render(&mut plain, 2);

    // One octave up via semitone steps on the selected slot
    bent.apply(&ev(Action::OscPitch, -1, 12.0));

    // 20 buffers = 5120 samples: ~51 cycles at 440 Hz, ~102 at 880 Hz
    let bent_cycles = rising_crossings(&render(&mut bent, 20));
    let plain_cycles = rising_crossings(&render(&mut plain, 20));
    assert!((50..=52).contains(&plain_cycles), "plain {plain_cycles}");
    assert!((100..=104).contains(&bent_cycles), "bent {bent_cycles}");
}

#[test]
fn template_edits_do_not_reach_held_voices() {
    let mut edited = single_slot_synth();
    let mut untouched = single_slot_synth();
    edited.apply(&ControlEvent::note_on(0));
    untouched.apply(&ControlEvent::note_on(0));
    render(&mut edited, 2);
    render(&mut untouched, 2);

    edited.apply(&ev(Action::OscAmp, 0, 0.1));
    edited.apply(&ev(Action::EnvAttack, 0, 0.8));
    edited.apply(&ev(Action::FilterFreq, 0, 0.0));
    edited.apply(&ev(Action::LfoSpeed, 0, 3.0));
    edited.apply(&ev(Action::LfoAmp, 0, 1.0));
    edited.apply(&ev(Action::OscType, 0, 0.0));

    for (x, y) in render(&mut edited, 4).iter().zip(render(&mut untouched, 4).iter()) {
        assert_eq!(x, y);
    }

    // A note started after the edits picks them up
    edited.apply(&ControlEvent::note_on(7));
    untouched.apply(&ControlEvent::note_on(7));
    let a = render(&mut edited, 1);
    let b = render(&mut untouched, 1);
    assert_ne!(a[0], b[0]);
}

#[test]
fn layer_stop_silences_selected_layer() {
    let mut synth = Synth::new(SR);
    synth.apply(&ControlEvent::note_on(0));
    render(&mut synth, 2);

    synth.apply(&ev(Action::LayerRecord, 0, 0.0));
    assert_eq!(synth.voice_count(), 0);
    for buf in render(&mut synth, 2) {
        assert!(buf.iter().all(|&s| s == 0.0));
    }
}
