//! Property-based tests for plate-core primitives.
//!
//! Covers delay-line sizing and echo integrity, allpass energy preservation,
//! lowpass contraction, and parameter clamping using proptest for randomized
//! inputs.

use plate_core::{
    AllpassDiffuser, DampingFilter, DattorroReverb, ReverbParam, RingDelay, capacity_for,
    decay_diffusion_2_for,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Capacity is the smallest power of two that holds the requested delay.
    #[test]
    fn capacity_is_smallest_power_of_two(max_delay in 1usize..1_000_000) {
        let line = RingDelay::new(max_delay).unwrap();
        let cap = line.capacity();
        prop_assert!(cap.is_power_of_two());
        prop_assert!(cap >= max_delay);
        prop_assert!(cap / 2 < max_delay, "capacity {} not minimal for {}", cap, max_delay);
        prop_assert_eq!(Some(cap), capacity_for(max_delay));
    }

    /// A value written at `t` comes back unchanged through a tap of the same
    /// delay at `t + delay`, for every legal delay and any counter start.
    #[test]
    fn echo_through_configured_tap(
        max_delay in 2usize..4096,
        delay_frac in 0.0f64..1.0,
        start in any::<usize>(),
        value in -1.0f64..=1.0,
    ) {
        let mut line = RingDelay::new(max_delay).unwrap();
        let cap = line.capacity();
        let delay = 1 + ((cap - 2) as f64 * delay_frac) as usize;
        prop_assume!(delay < cap);

        line.set_delay(delay).unwrap();
        let tap = line.tap(delay).unwrap();

        line.write(start, value);
        for i in 1..delay {
            line.write(start.wrapping_add(i), 0.0);
        }
        let later = start.wrapping_add(delay);
        prop_assert_eq!(line.read(tap, later), value);
        prop_assert_eq!(line.read_at(later, delay), value);
        prop_assert_eq!(line.write_then_read(later, 0.0), value);
    }

    /// Any delay at or beyond capacity is rejected.
    #[test]
    fn out_of_range_taps_rejected(max_delay in 1usize..4096, excess in 0usize..10_000) {
        let mut line = RingDelay::new(max_delay).unwrap();
        let bad = line.capacity() + excess;
        prop_assert!(line.tap(bad).is_err());
        prop_assert!(line.set_delay(bad).is_err());
        prop_assert_eq!(line.delay(), 0);
    }

    /// With |gain| < 1 the allpass returns all input energy once the tail
    /// has rung out.
    #[test]
    fn allpass_preserves_energy(
        delay in 1usize..32,
        gain in -0.9f64..0.9,
        signal in prop::collection::vec(-1.0f64..=1.0, 1..64),
    ) {
        let mut ap = AllpassDiffuser::new(delay).unwrap();
        // Tail decays by |gain| per loop; 0.9^600 is far below f64 resolution.
        let window = signal.len() + delay * 600;

        let mut e_in = 0.0;
        let mut e_out = 0.0;
        for t in 0..window {
            let x = signal.get(t).copied().unwrap_or(0.0);
            let y = ap.process(t, gain, x);
            prop_assert!(y.is_finite());
            e_in += x * x;
            e_out += y * y;
        }

        prop_assume!(e_in > 1e-12);
        let err = (e_out - e_in).abs() / e_in;
        prop_assert!(err < 1e-9, "energy in {} out {} (rel err {})", e_in, e_out, err);
    }

    /// Constant input: the lowpass moves monotonically toward the input and
    /// never crosses it.
    #[test]
    fn damping_filter_contracts(
        start in -10.0f64..10.0,
        target in -10.0f64..10.0,
        coefficient in 0.001f64..=1.0,
    ) {
        let mut lp = DampingFilter::new();
        lp.process(1.0, start);

        // One rounding step of slack: `prev + (target - prev)` is not exact in f64.
        let tol = 1e-12;
        let rising = start <= target;
        let mut prev = start;
        for _ in 0..20_000 {
            let y = lp.process(coefficient, target);
            if rising {
                prop_assert!(y >= prev - tol && y <= target + tol, "prev {} y {} target {}", prev, y, target);
            } else {
                prop_assert!(y <= prev + tol && y >= target - tol, "prev {} y {} target {}", prev, y, target);
            }
            prev = y;
        }
        prop_assert!((prev - target).abs() < 1e-6);
    }

    /// The derived diffusion always sits in [0.25, 0.5] and follows decay.
    #[test]
    fn decay_diffusion_2_bounds(decay in -2.0f64..3.0) {
        let mut reverb = DattorroReverb::new().unwrap();
        reverb.set_decay(decay);
        let dd2 = reverb.decay_diffusion_2();
        prop_assert!((0.25..=0.5).contains(&dd2));
        prop_assert_eq!(dd2, decay_diffusion_2_for(reverb.params().decay));
    }

    /// Setters keep every parameter inside its declared range.
    #[test]
    fn setters_stay_in_range(index in 0usize..ReverbParam::COUNT, value in -100.0f64..100.0) {
        let mut reverb = DattorroReverb::new().unwrap();
        let param = ReverbParam::ALL[index];
        reverb.set(param, value);
        let (min, max) = param.range();
        let stored = param.get(&reverb.params());
        prop_assert!(stored >= min && stored <= max);
    }
}
