//! Integration tests for the plate-core reverb engine.
//!
//! Drives [`DattorroReverb`] end to end with impulses and short bursts and
//! checks signal-level behaviour: onset timing, long-tail stability,
//! determinism under identical parameter automation, linearity, and
//! parameter hand-off from a control thread.

use plate_core::{DattorroReverb, MAX_PRE_DELAY, ReverbParam, ReverbParams};

const SAMPLE_RATE: usize = 48_000;

/// Run an impulse of `amplitude` followed by silence and collect the stereo output.
fn impulse_response(reverb: &mut DattorroReverb, amplitude: f64, len: usize) -> Vec<(f64, f64)> {
    (0..len)
        .map(|n| reverb.process_stereo(if n == 0 { amplitude } else { 0.0 }))
        .collect()
}

/// Sum of squares over both channels.
fn energy(block: &[(f64, f64)]) -> f64 {
    block.iter().map(|&(l, r)| l * l + r * r).sum()
}

fn first_nonzero(ir: &[(f64, f64)]) -> Option<usize> {
    ir.iter().position(|&(l, r)| l != 0.0 || r != 0.0)
}

// ============================================================================
// 1. Onset and tail
// ============================================================================

#[test]
fn impulse_onset_follows_pre_delay() {
    // Earliest output tap is 266 samples into pre-damping B, read after the
    // counter advances.
    let cases = [(0.0, 0), (0.1, 480), (0.5, 2400), (1.0, MAX_PRE_DELAY)];
    for (fraction, samples) in cases {
        let mut reverb = DattorroReverb::new().unwrap();
        reverb.set_pre_delay(fraction);
        assert_eq!(reverb.pre_delay_samples(), samples);

        let ir = impulse_response(&mut reverb, 1.0, samples + 2000);
        assert_eq!(
            first_nonzero(&ir),
            Some(samples + 266 - 1),
            "pre-delay fraction {fraction}"
        );
    }
}

#[test]
fn default_impulse_builds_a_dense_tail() {
    let mut reverb = DattorroReverb::new().unwrap();
    let ir = impulse_response(&mut reverb, 1.0, SAMPLE_RATE);

    assert!(ir[..745].iter().all(|&(l, r)| l == 0.0 && r == 0.0));
    assert!(energy(&ir[745..2000]) > 1e-4);

    // Both channels keep ringing half a second later, and differ.
    let late = &ir[SAMPLE_RATE / 2..];
    assert!(late.iter().any(|&(l, _)| l.abs() > 1e-6));
    assert!(late.iter().any(|&(_, r)| r.abs() > 1e-6));
    assert!(late.iter().any(|&(l, r)| l != r));
}

#[test]
fn ten_second_impulse_decays_and_stays_finite() {
    let mut reverb = DattorroReverb::new().unwrap();
    let ir = impulse_response(&mut reverb, 1.0, 10 * SAMPLE_RATE);
    assert!(ir.iter().all(|&(l, r)| l.is_finite() && r.is_finite()));

    let blocks: Vec<f64> = ir.chunks(SAMPLE_RATE / 2).map(energy).collect();
    for (k, pair) in blocks.windows(2).enumerate().skip(1) {
        assert!(
            pair[1] < pair[0],
            "energy rose between blocks {} and {}: {} -> {}",
            k,
            k + 1,
            pair[0],
            pair[1]
        );
    }
    let last = blocks[blocks.len() - 1];
    assert!(last < blocks[1] * 1e-6, "tail did not decay: {last}");
}

#[test]
fn maximum_decay_and_diffusion_stay_bounded() {
    let mut reverb = DattorroReverb::new().unwrap();
    for param in ReverbParam::ALL {
        reverb.set(param, 1.0);
    }
    let ir = impulse_response(&mut reverb, 1.0, 4 * SAMPLE_RATE);
    let peak = ir
        .iter()
        .map(|&(l, r)| l.abs().max(r.abs()))
        .fold(0.0, f64::max);
    assert!(peak.is_finite());
    assert!(peak < 100.0, "peak {peak}");
}

#[test]
fn zero_decay_cuts_the_tail() {
    let mut reverb = DattorroReverb::new().unwrap();
    reverb.set_decay(0.0);
    let ir = impulse_response(&mut reverb, 1.0, 20_000);

    // With no feedback only the diffuser loops ring; everything past the
    // damping multiply stays silent.
    let early = energy(&ir[745..6000]);
    let late = energy(&ir[15_000..]);
    assert!(early > 0.0);
    assert!(late < early * 1e-3, "early {early} late {late}");
    assert!(reverb.decay_diffusion_2() == 0.25);
}

// ============================================================================
// 2. Determinism and linearity
// ============================================================================

/// Burst input with a parameter automation script applied at fixed indices.
fn automated_run(reverb: &mut DattorroReverb) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(30_000);
    for n in 0..30_000 {
        match n {
            3_000 => reverb.set_decay(0.9),
            7_500 => reverb.set_damping(0.3),
            12_000 => reverb.set_pre_delay(0.25),
            20_000 => reverb.set_decay_diffusion_1(0.5),
            _ => {}
        }
        let x = if n % 1_000 < 3 { 0.5 } else { 0.0 };
        out.push(reverb.process_stereo(x));
    }
    out
}

#[test]
fn identical_runs_are_bit_identical() {
    let mut a = DattorroReverb::new().unwrap();
    let mut b = DattorroReverb::new().unwrap();
    assert_eq!(automated_run(&mut a), automated_run(&mut b));
    assert_eq!(a.params(), b.params());
}

#[test]
fn with_params_matches_setters() {
    let params = ReverbParams {
        pre_delay: 0.05,
        decay: 0.6,
        damping: 0.5,
        ..ReverbParams::default()
    };
    let mut a = DattorroReverb::with_params(&params).unwrap();
    let mut b = DattorroReverb::new().unwrap();
    b.set_pre_delay(0.05);
    b.set_decay(0.6);
    b.set_damping(0.5);

    assert_eq!(impulse_response(&mut a, 1.0, 8_000), impulse_response(&mut b, 1.0, 8_000));
}

#[test]
fn scaling_input_by_two_scales_output_exactly() {
    // Every stage is a sum of products; doubling is exact in binary floating point.
    let mut unit = DattorroReverb::new().unwrap();
    let mut double = DattorroReverb::new().unwrap();
    let a = impulse_response(&mut unit, 1.0, 12_000);
    let b = impulse_response(&mut double, 2.0, 12_000);
    for (n, (&(l1, r1), &(l2, r2))) in a.iter().zip(&b).enumerate() {
        assert_eq!((l1 * 2.0, r1 * 2.0), (l2, r2), "sample {n}");
    }
}

// ============================================================================
// 3. Control thread hand-off
// ============================================================================

#[test]
fn controls_from_another_thread_land_between_samples() {
    let mut reverb = DattorroReverb::new().unwrap();
    let mut controls = reverb.controls();

    let (tx, rx) = std::sync::mpsc::channel();
    let writer = std::thread::spawn(move || {
        controls.update(|p| {
            p.decay = 0.3;
            p.damping = 0.2;
            p.pre_delay = 0.0;
        });
        tx.send(()).unwrap();
        controls
    });

    rx.recv().unwrap();
    let controls = writer.join().unwrap();
    assert_eq!(reverb.params().decay, 0.75);

    reverb.process(0.0);
    let applied = reverb.params();
    assert_eq!(applied, controls.params());
    assert_eq!(reverb.pre_delay_samples(), 0);
    assert!((reverb.decay_diffusion_2() - 0.45).abs() < 1e-12);
}

#[test]
fn remote_snapshot_is_clamped_on_arrival() {
    let mut reverb = DattorroReverb::new().unwrap();
    let mut controls = reverb.controls();
    controls.set_decay(7.0);
    controls.set_input_diffusion_2(f64::NAN);

    reverb.process(0.0);
    assert_eq!(reverb.params().decay, 1.0);
    assert_eq!(reverb.params().input_diffusion_2, 0.625);
}
