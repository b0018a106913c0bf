//! Dattorro plate reverb engine.
//!
//! Mono in, stereo out. The topology follows Jon Dattorro, "Effect Design
//! Part 1: Reverberator and Other Filters" (JAES, 1997):
//!
//! ```text
//! in -> pre-delay -> pre-filter -> AP 142 -> AP 107 -> AP 379 -> AP 277 --+
//!                                                                         |
//!        +----------------------------------------------------------------+
//!        |                                   |
//!        v                                   v
//!   (+)<-- decay * post B               (+)<-- decay * post A
//!    |                                   |
//!   mod AP 672 (-dd1)                   mod AP 908 (-dd1)
//!   delay 4453                          delay 4217
//!   damping LP                          damping LP
//!   * decay                             * decay
//!   AP 1800 (dd2)                       AP 2656 (dd2)
//!   delay 3720 ---> post A              delay 3163 ---> post B
//! ```
//!
//! The left output is drawn mostly from half B and the right from half A,
//! each with a few negative taps from the opposite half.
//!
//! # Tuning
//!
//! All delay lengths, output taps and the modulation period are fixed sample
//! counts tuned for 48 kHz. They are not rescaled for other rates: the
//! engine runs at any rate, but room size and modulation speed scale with it.

use crate::allpass::AllpassDiffuser;
use crate::damping::DampingFilter;
use crate::delay::{RingDelay, Tap};
use crate::error::ReverbError;
use crate::params::{MAX_PRE_DELAY, ReverbParam, ReverbParams, decay_diffusion_2_for};

#[cfg(feature = "std")]
use crate::controls::{self, ParamReceiver, ReverbControls};

/// Sample rate the fixed delay lengths were tuned for.
pub const REFERENCE_SAMPLE_RATE: f64 = 48_000.0;

/// Input diffuser lengths, in processing order.
const INPUT_DIFFUSION: [usize; 4] = [142, 107, 379, 277];

/// The decay-diffusion-1 taps move one sample every this many samples.
const MODULATION_STEP: usize = 2048;

/// Full period of the triangular excursion sweep.
const MODULATION_PERIOD: usize = 65536;

/// Delay lengths and output taps of one tank half.
///
/// `out_*` taps feed this half's own channel (right for A, left for B);
/// `cross_*` taps are subtracted from, or for the post-damping line added
/// to, the opposite channel.
struct HalfTuning {
    decay_diffusion_1: usize,
    pre_damping: usize,
    decay_diffusion_2: usize,
    post_damping: usize,
    out_pre_damping: [usize; 2],
    out_decay_diffusion_2: usize,
    out_post_damping: usize,
    cross_pre_damping: usize,
    cross_decay_diffusion_2: usize,
    cross_post_damping: usize,
}

const HALF_A: HalfTuning = HalfTuning {
    decay_diffusion_1: 672,
    pre_damping: 4453,
    decay_diffusion_2: 1800,
    post_damping: 3720,
    out_pre_damping: [353, 3627],
    out_decay_diffusion_2: 1228,
    out_post_damping: 2673,
    cross_pre_damping: 1990,
    cross_decay_diffusion_2: 187,
    cross_post_damping: 1066,
};

const HALF_B: HalfTuning = HalfTuning {
    decay_diffusion_1: 908,
    pre_damping: 4217,
    decay_diffusion_2: 2656,
    post_damping: 3163,
    out_pre_damping: [266, 2974],
    out_decay_diffusion_2: 1913,
    out_post_damping: 1996,
    cross_pre_damping: 2111,
    cross_decay_diffusion_2: 335,
    cross_post_damping: 121,
};

/// Output taps of one tank half.
#[derive(Debug, Clone, Copy)]
struct HalfTaps {
    out_pre_damping: [Tap; 2],
    out_decay_diffusion_2: Tap,
    out_post_damping: Tap,
    cross_pre_damping: Tap,
    cross_decay_diffusion_2: Tap,
    cross_post_damping: Tap,
}

/// One branch of the figure-eight tank.
#[derive(Debug, Clone)]
struct TankHalf {
    decay_diffusion_1: AllpassDiffuser,
    pre_damping: RingDelay,
    damping: DampingFilter,
    decay_diffusion_2: AllpassDiffuser,
    post_damping: RingDelay,
    nominal_decay_diffusion_1: Tap,
    taps: HalfTaps,
}

impl TankHalf {
    fn new(tuning: &HalfTuning) -> Result<Self, ReverbError> {
        let decay_diffusion_1 = AllpassDiffuser::new(tuning.decay_diffusion_1)?;
        let pre_damping = RingDelay::with_delay(tuning.pre_damping)?;
        let decay_diffusion_2 = AllpassDiffuser::new(tuning.decay_diffusion_2)?;
        let post_damping = RingDelay::with_delay(tuning.post_damping)?;

        let taps = HalfTaps {
            out_pre_damping: [
                pre_damping.tap(tuning.out_pre_damping[0])?,
                pre_damping.tap(tuning.out_pre_damping[1])?,
            ],
            out_decay_diffusion_2: decay_diffusion_2.tap(tuning.out_decay_diffusion_2)?,
            out_post_damping: post_damping.tap(tuning.out_post_damping)?,
            cross_pre_damping: pre_damping.tap(tuning.cross_pre_damping)?,
            cross_decay_diffusion_2: decay_diffusion_2.tap(tuning.cross_decay_diffusion_2)?,
            cross_post_damping: post_damping.tap(tuning.cross_post_damping)?,
        };

        let nominal_decay_diffusion_1 = decay_diffusion_1.main_tap();

        Ok(Self {
            decay_diffusion_1,
            pre_damping,
            damping: DampingFilter::new(),
            decay_diffusion_2,
            post_damping,
            nominal_decay_diffusion_1,
            taps,
        })
    }

    /// Runs steps b–g of the tank for one sample; `input` already carries
    /// the cross-feedback from the other half.
    #[inline]
    fn process(&mut self, t: usize, input: f64, gains: &TankGains) {
        let mut x = self.decay_diffusion_1.process(t, -gains.decay_diffusion_1, input);
        x = self.pre_damping.write_then_read(t, x);
        x = self.damping.process(gains.damping, x);
        x *= gains.decay;
        x = self.decay_diffusion_2.process(t, gains.decay_diffusion_2, x);
        self.post_damping.write(t, x);
    }

    /// This half's contribution to its own channel.
    #[inline]
    fn own_channel(&self, t: usize) -> f64 {
        let taps = &self.taps;
        let mut a = self.pre_damping.read(taps.out_pre_damping[0], t);
        a += self.pre_damping.read(taps.out_pre_damping[1], t);
        a -= self.decay_diffusion_2.read(taps.out_decay_diffusion_2, t);
        a += self.post_damping.read(taps.out_post_damping, t);
        a
    }

    /// Adds this half's contribution to the opposite channel's sum `a`.
    #[inline]
    fn mix_cross(&self, mut a: f64, t: usize) -> f64 {
        let taps = &self.taps;
        a -= self.pre_damping.read(taps.cross_pre_damping, t);
        a -= self.decay_diffusion_2.read(taps.cross_decay_diffusion_2, t);
        a += self.post_damping.read(taps.cross_post_damping, t);
        a
    }

    fn clear(&mut self) {
        self.decay_diffusion_1.clear();
        self.pre_damping.clear();
        self.damping.reset();
        self.decay_diffusion_2.clear();
        self.post_damping.clear();
        self.decay_diffusion_1.set_tap(self.nominal_decay_diffusion_1);
    }
}

/// Gains shared by both tank halves.
#[derive(Debug, Clone, Copy)]
struct TankGains {
    decay_diffusion_1: f64,
    damping: f64,
    decay: f64,
    decay_diffusion_2: f64,
}

/// Dattorro plate reverb: one mono sample in, one stereo pair out.
///
/// Call [`process`](Self::process) exactly once per input sample, then read
/// [`left`](Self::left) and [`right`](Self::right) (100% wet). All storage is
/// allocated by [`new`](Self::new); processing never allocates.
///
/// # Example
///
/// ```rust
/// use plate_core::DattorroReverb;
///
/// let mut reverb = DattorroReverb::new().unwrap();
/// reverb.set_decay(0.6);
///
/// let mut tail = Vec::new();
/// for n in 0..4800 {
///     let x = if n == 0 { 1.0 } else { 0.0 };
///     reverb.process(x);
///     tail.push((reverb.left(), reverb.right()));
/// }
/// assert!(tail.iter().any(|&(l, r)| l != 0.0 && r != 0.0));
/// ```
pub struct DattorroReverb {
    pre_delay: RingDelay,
    pre_filter: DampingFilter,
    input_diffusion: [AllpassDiffuser; 4],
    tank: [TankHalf; 2],

    params: ReverbParams,
    decay_diffusion_2: f64,

    t: usize,

    #[cfg(feature = "std")]
    remote: Option<ParamReceiver>,
}

impl core::fmt::Debug for DattorroReverb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DattorroReverb")
            .field("params", &self.params)
            .field("decay_diffusion_2", &self.decay_diffusion_2)
            .field("t", &self.t)
            .finish_non_exhaustive()
    }
}

impl DattorroReverb {
    /// Builds an engine with default parameters and silent buffers.
    ///
    /// Fails with [`ReverbError::Allocation`] if any delay line cannot be
    /// allocated; nothing is returned in that case.
    pub fn new() -> Result<Self, ReverbError> {
        Self::with_params(&ReverbParams::default())
    }

    /// Builds an engine starting from `params` (clamped).
    pub fn with_params(params: &ReverbParams) -> Result<Self, ReverbError> {
        let pre_delay = RingDelay::with_delay(MAX_PRE_DELAY)?;
        let input_diffusion = [
            AllpassDiffuser::new(INPUT_DIFFUSION[0])?,
            AllpassDiffuser::new(INPUT_DIFFUSION[1])?,
            AllpassDiffuser::new(INPUT_DIFFUSION[2])?,
            AllpassDiffuser::new(INPUT_DIFFUSION[3])?,
        ];
        let tank = [TankHalf::new(&HALF_A)?, TankHalf::new(&HALF_B)?];

        let mut reverb = Self {
            pre_delay,
            pre_filter: DampingFilter::new(),
            input_diffusion,
            tank,
            params: ReverbParams::default(),
            decay_diffusion_2: decay_diffusion_2_for(ReverbParams::default().decay),
            t: 0,
            #[cfg(feature = "std")]
            remote: None,
        };
        reverb.set_params(params);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "reverb: allocated {} samples across 13 delay lines",
            reverb.allocated_samples()
        );

        Ok(reverb)
    }

    /// Processes one input sample.
    ///
    /// Afterwards [`left`](Self::left) and [`right`](Self::right) return the
    /// stereo output for this sample.
    #[inline]
    pub fn process(&mut self, input: f64) {
        #[cfg(feature = "std")]
        self.poll_remote();

        let t = self.t;
        self.modulate(t);

        let mut x = self.pre_delay.write_then_read(t, input);
        x = self.pre_filter.process(self.params.pre_filter, x);

        let id1 = self.params.input_diffusion_1;
        let id2 = self.params.input_diffusion_2;
        x = self.input_diffusion[0].process(t, id1, x);
        x = self.input_diffusion[1].process(t, id1, x);
        x = self.input_diffusion[2].process(t, id2, x);
        x = self.input_diffusion[3].process(t, id2, x);

        let gains = TankGains {
            decay_diffusion_1: self.params.decay_diffusion_1,
            damping: self.params.damping,
            decay: self.params.decay,
            decay_diffusion_2: self.decay_diffusion_2,
        };
        for i in 0..2 {
            let feedback = self.tank[1 - i].post_damping.read_main(t) * gains.decay;
            self.tank[i].process(t, x + feedback, &gains);
        }

        self.t = t.wrapping_add(1);
    }

    /// Left output of the most recently processed sample.
    #[inline]
    pub fn left(&self) -> f64 {
        let [a, b] = &self.tank;
        a.mix_cross(b.own_channel(self.t), self.t)
    }

    /// Right output of the most recently processed sample.
    #[inline]
    pub fn right(&self) -> f64 {
        let [a, b] = &self.tank;
        b.mix_cross(a.own_channel(self.t), self.t)
    }

    /// Processes one sample and returns `(left, right)`.
    #[inline]
    pub fn process_stereo(&mut self, input: f64) -> (f64, f64) {
        self.process(input);
        (self.left(), self.right())
    }

    /// Processes a block of mono input into separate left/right buffers.
    ///
    /// All three slices must have the same length.
    pub fn process_block(
        &mut self,
        input: &[f64],
        left: &mut [f64],
        right: &mut [f64],
    ) -> Result<(), ReverbError> {
        if input.len() != left.len() || input.len() != right.len() {
            return Err(ReverbError::BlockLength {
                input: input.len(),
                left: left.len(),
                right: right.len(),
            });
        }
        for ((&x, l), r) in input.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            self.process(x);
            *l = self.left();
            *r = self.right();
        }
        Ok(())
    }

    /// Clears every buffer and filter, rewinds the sample counter and
    /// re-centres the modulated taps. Parameters are kept.
    pub fn reset(&mut self) {
        self.pre_delay.clear();
        self.pre_filter.reset();
        for diffuser in &mut self.input_diffusion {
            diffuser.clear();
        }
        for half in &mut self.tank {
            half.clear();
        }
        self.t = 0;

        #[cfg(feature = "tracing")]
        tracing::debug!("reverb: reset");
    }

    /// True until the first sample is processed after construction or
    /// [`reset`](Self::reset).
    pub fn is_idle(&self) -> bool {
        self.t == 0
    }

    /// Returns a control handle for changing parameters from another thread.
    ///
    /// Snapshots published through the handle are applied at the start of
    /// the next [`process`](Self::process) call. Only the parameters a
    /// publish touched are applied: a value set directly on the engine stays
    /// until the handle publishes that same parameter. The latest write to
    /// each parameter wins. Calling this again detaches the previous handle.
    #[cfg(feature = "std")]
    pub fn controls(&mut self) -> ReverbControls {
        let (controls, receiver) = controls::channel(&self.params);
        self.remote = Some(receiver);
        controls
    }

    #[cfg(feature = "std")]
    #[inline]
    fn poll_remote(&mut self) {
        if let Some(update) = self.remote.as_mut().and_then(ParamReceiver::poll) {
            for param in ReverbParam::ALL {
                if update.changed[param.index()] {
                    self.apply(param, param.get(&update.params));
                }
            }
        }
    }

    /// Steps both decay-diffusion-1 loops along the triangular sweep.
    #[inline]
    fn modulate(&mut self, t: usize) {
        if t % MODULATION_STEP != 0 {
            return;
        }
        let delta = if t % MODULATION_PERIOD < MODULATION_PERIOD / 2 {
            1
        } else {
            -1
        };
        for half in &mut self.tank {
            half.decay_diffusion_1.modulate(delta);
        }
    }

    // -- Parameters --

    /// Current (clamped) parameter snapshot.
    pub fn params(&self) -> ReverbParams {
        self.params
    }

    /// Applies every field of `params`, clamping as the individual setters do.
    pub fn set_params(&mut self, params: &ReverbParams) {
        for param in ReverbParam::ALL {
            self.set(param, param.get(params));
        }
    }

    /// Sets one parameter by id. `NaN` is ignored.
    pub fn set(&mut self, param: ReverbParam, value: f64) {
        #[cfg(feature = "tracing")]
        match param.clamp(value) {
            None => tracing::debug!("reverb: ignoring NaN for {}", param),
            Some(clamped) if clamped != value => {
                tracing::debug!("reverb: {} clamped from {} to {}", param, value, clamped);
            }
            Some(_) => {}
        }

        self.apply(param, value);
    }

    /// Clamps and stores one parameter without logging. This is the only
    /// path taken on the audio thread.
    #[inline]
    fn apply(&mut self, param: ReverbParam, value: f64) {
        let Some(clamped) = param.clamp(value) else {
            return;
        };

        param.set(&mut self.params, clamped);
        match param {
            ReverbParam::PreDelay => {
                let samples = ((clamped * MAX_PRE_DELAY as f64) as usize).min(MAX_PRE_DELAY);
                let moved = self.pre_delay.set_delay(samples);
                debug_assert!(moved.is_ok(), "pre-delay line holds {MAX_PRE_DELAY} samples");
            }
            ReverbParam::Decay => {
                self.decay_diffusion_2 = decay_diffusion_2_for(clamped);
            }
            _ => {}
        }
    }

    /// Sets the pre-delay as a fraction of the 4800-sample maximum.
    pub fn set_pre_delay(&mut self, fraction: f64) {
        self.set(ReverbParam::PreDelay, fraction);
    }

    /// Sets the input lowpass bandwidth (1.0 = unfiltered).
    pub fn set_pre_filter(&mut self, value: f64) {
        self.set(ReverbParam::PreFilter, value);
    }

    /// Sets the gain of the first two input diffusers.
    pub fn set_input_diffusion_1(&mut self, value: f64) {
        self.set(ReverbParam::InputDiffusion1, value);
    }

    /// Sets the gain of the last two input diffusers.
    pub fn set_input_diffusion_2(&mut self, value: f64) {
        self.set(ReverbParam::InputDiffusion2, value);
    }

    /// Sets the gain of the modulated tank diffusers.
    pub fn set_decay_diffusion_1(&mut self, value: f64) {
        self.set(ReverbParam::DecayDiffusion1, value);
    }

    /// Sets the tank feedback gain and re-derives decay diffusion 2.
    pub fn set_decay(&mut self, value: f64) {
        self.set(ReverbParam::Decay, value);
    }

    /// Sets the tank lowpass bandwidth (1.0 = no damping).
    pub fn set_damping(&mut self, value: f64) {
        self.set(ReverbParam::Damping, value);
    }

    /// Derived gain of the second tank diffusers.
    pub fn decay_diffusion_2(&self) -> f64 {
        self.decay_diffusion_2
    }

    /// Current pre-delay length in samples.
    pub fn pre_delay_samples(&self) -> usize {
        self.pre_delay.delay()
    }

    /// Current loop lengths of the modulated diffusers `[A, B]`.
    pub fn modulated_delays(&self) -> [usize; 2] {
        [
            self.tank[0].decay_diffusion_1.delay(),
            self.tank[1].decay_diffusion_1.delay(),
        ]
    }

    /// Total number of samples held across all delay lines.
    pub fn allocated_samples(&self) -> usize {
        let inputs: usize = self
            .input_diffusion
            .iter()
            .map(|d| d.line().capacity())
            .sum();
        let tank: usize = self
            .tank
            .iter()
            .map(|h| {
                h.decay_diffusion_1.line().capacity()
                    + h.pre_damping.capacity()
                    + h.decay_diffusion_2.line().capacity()
                    + h.post_damping.capacity()
            })
            .sum();
        self.pre_delay.capacity() + inputs + tank
    }
}
