//! Lock-free parameter hand-off from a control thread to the audio thread.
//!
//! A [`ReverbControls`] handle lives on the control side (UI, automation,
//! network) and publishes complete [`ReverbParams`] snapshots. The engine
//! polls for a new snapshot at the top of every
//! [`process`](crate::DattorroReverb::process) call and applies it as one
//! unit, so the audio thread never sees half of a multi-parameter change.
//!
//! Values are stored as `f64` bit patterns in [`AtomicU64`]s guarded by a
//! sequence counter (a seqlock):
//!
//! - the writer bumps the sequence to an odd value, stores every slot, then
//!   bumps it to the next even value;
//! - the reader loads the sequence, copies the slots and re-checks the
//!   sequence. An odd or changed sequence means a write was in progress: the
//!   copy is discarded and the engine keeps its current parameters until the
//!   next sample.
//!
//! Each slot also carries a generation number that the writer bumps only
//! for the parameters a call actually touched. The engine applies just those
//! parameters, so values it was given through its own setters survive a
//! publish that concerns something else.
//!
//! The reader never spins or blocks. There is exactly one writer per
//! engine because [`ReverbControls`] is not `Clone` and its setters take
//! `&mut self`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering, fence};

use crate::params::{ReverbParam, ReverbParams};

struct SharedParams {
    sequence: AtomicU64,
    values: [AtomicU64; ReverbParam::COUNT],
    generations: [AtomicU64; ReverbParam::COUNT],
}

impl SharedParams {
    fn new(params: &ReverbParams) -> Self {
        Self {
            sequence: AtomicU64::new(0),
            values: params.to_array().map(|v| AtomicU64::new(v.to_bits())),
            generations: core::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

/// A consistent snapshot plus which of its parameters were published since
/// the previous poll.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RemoteUpdate {
    pub(crate) params: ReverbParams,
    pub(crate) changed: [bool; ReverbParam::COUNT],
}

/// Control-side handle that publishes parameter snapshots to one engine.
///
/// Obtained from [`DattorroReverb::controls`](crate::DattorroReverb::controls).
/// Setters record the new value locally and publish it; use
/// [`update`](Self::update) to change several parameters at once. Only the
/// parameters a call touches are applied by the engine, so the handle's
/// [`params`](Self::params) can differ from the engine's for parameters
/// that were set directly on the engine.
///
/// # Example
///
/// ```rust
/// use plate_core::DattorroReverb;
///
/// let mut reverb = DattorroReverb::new().unwrap();
/// let mut controls = reverb.controls();
///
/// std::thread::spawn(move || {
///     controls.update(|p| {
///         p.decay = 0.9;
///         p.damping = 0.4;
///     });
/// })
/// .join()
/// .unwrap();
///
/// reverb.process(0.0);
/// assert_eq!(reverb.params().decay, 0.9);
/// ```
pub struct ReverbControls {
    shared: Arc<SharedParams>,
    current: ReverbParams,
    generations: [u64; ReverbParam::COUNT],
}

impl core::fmt::Debug for ReverbControls {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReverbControls")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl ReverbControls {
    /// Last snapshot published through this handle.
    pub fn params(&self) -> ReverbParams {
        self.current
    }

    /// Applies `edit` to a copy of the current snapshot and publishes the
    /// fields it changed.
    pub fn update(&mut self, edit: impl FnOnce(&mut ReverbParams)) {
        let before = self.current.to_array();
        edit(&mut self.current);
        let after = self.current.to_array();
        let touched = core::array::from_fn(|i| before[i].to_bits() != after[i].to_bits());
        self.publish(touched);
    }

    /// Replaces the whole snapshot, overriding every engine parameter.
    pub fn set_params(&mut self, params: ReverbParams) {
        self.current = params;
        self.publish([true; ReverbParam::COUNT]);
    }

    /// Sets one parameter by id.
    pub fn set(&mut self, param: ReverbParam, value: f64) {
        param.set(&mut self.current, value);
        let mut touched = [false; ReverbParam::COUNT];
        touched[param.index()] = true;
        self.publish(touched);
    }

    /// Publishes a new pre-delay fraction.
    pub fn set_pre_delay(&mut self, value: f64) {
        self.set(ReverbParam::PreDelay, value);
    }

    /// Publishes a new pre-filter bandwidth.
    pub fn set_pre_filter(&mut self, value: f64) {
        self.set(ReverbParam::PreFilter, value);
    }

    /// Publishes a new input diffusion 1 gain.
    pub fn set_input_diffusion_1(&mut self, value: f64) {
        self.set(ReverbParam::InputDiffusion1, value);
    }

    /// Publishes a new input diffusion 2 gain.
    pub fn set_input_diffusion_2(&mut self, value: f64) {
        self.set(ReverbParam::InputDiffusion2, value);
    }

    /// Publishes a new decay diffusion 1 gain.
    pub fn set_decay_diffusion_1(&mut self, value: f64) {
        self.set(ReverbParam::DecayDiffusion1, value);
    }

    /// Publishes a new decay amount.
    pub fn set_decay(&mut self, value: f64) {
        self.set(ReverbParam::Decay, value);
    }

    /// Publishes a new damping bandwidth.
    pub fn set_damping(&mut self, value: f64) {
        self.set(ReverbParam::Damping, value);
    }

    fn publish(&mut self, touched: [bool; ReverbParam::COUNT]) {
        for (generation, touched) in self.generations.iter_mut().zip(touched) {
            if touched {
                *generation = generation.wrapping_add(1);
            }
        }

        let shared = &*self.shared;
        let seq = shared.sequence.load(Ordering::Relaxed);
        shared.sequence.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        for (slot, value) in shared.values.iter().zip(self.current.to_array()) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
        for (slot, &generation) in shared.generations.iter().zip(&self.generations) {
            slot.store(generation, Ordering::Relaxed);
        }

        shared
            .sequence
            .store(seq.wrapping_add(2), Ordering::Release);
    }
}

/// Audio-side end of a [`ReverbControls`] pair, owned by the engine.
pub(crate) struct ParamReceiver {
    shared: Arc<SharedParams>,
    seen: u64,
    seen_generations: [u64; ReverbParam::COUNT],
}

impl ParamReceiver {
    /// Returns the newest consistent snapshot, if one arrived since the last poll.
    #[inline]
    pub(crate) fn poll(&mut self) -> Option<RemoteUpdate> {
        let shared = &*self.shared;
        let before = shared.sequence.load(Ordering::Acquire);
        if before == self.seen || before & 1 == 1 {
            return None;
        }

        let mut values = [0.0; ReverbParam::COUNT];
        for (value, slot) in values.iter_mut().zip(shared.values.iter()) {
            *value = f64::from_bits(slot.load(Ordering::Relaxed));
        }
        let mut generations = [0; ReverbParam::COUNT];
        for (generation, slot) in generations.iter_mut().zip(shared.generations.iter()) {
            *generation = slot.load(Ordering::Relaxed);
        }

        fence(Ordering::Acquire);
        if shared.sequence.load(Ordering::Relaxed) != before {
            return None;
        }

        let changed = core::array::from_fn(|i| generations[i] != self.seen_generations[i]);
        self.seen = before;
        self.seen_generations = generations;
        Some(RemoteUpdate {
            params: ReverbParams::from_array(values),
            changed,
        })
    }
}

/// Creates a connected control/receiver pair seeded with `params`.
pub(crate) fn channel(params: &ReverbParams) -> (ReverbControls, ParamReceiver) {
    let shared = Arc::new(SharedParams::new(params));
    (
        ReverbControls {
            shared: Arc::clone(&shared),
            current: *params,
            generations: [0; ReverbParam::COUNT],
        },
        ParamReceiver {
            shared,
            seen: 0,
            seen_generations: [0; ReverbParam::COUNT],
        },
    )
}
