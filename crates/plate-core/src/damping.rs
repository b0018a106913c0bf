//! One-pole lowpass used for the input pre-filter and tank damping.
//!
//! ```text
//! y[n] = y[n-1] + c * (x[n] - y[n-1])
//! ```
//!
//! `c` is the bandwidth coefficient in `[0, 1]`: `c = 1` passes the input
//! unchanged, smaller values smooth harder and absorb more high-frequency
//! energy. Unlike a cutoff-in-Hz filter the coefficient is supplied per call,
//! so the engine's `pre_filter` and `damping` parameters drive it directly.

/// One-pole (6 dB/oct) lowpass with a single state value.
///
/// # Invariants
///
/// For constant input `k` and `c` in `(0, 1]` the output approaches `k`
/// monotonically and never overshoots.
#[derive(Debug, Clone, Default)]
pub struct DampingFilter {
    state: f64,
}

impl DampingFilter {
    /// Creates a filter with zero state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one sample with bandwidth `coefficient`.
    #[inline]
    pub fn process(&mut self, coefficient: f64, input: f64) -> f64 {
        self.state += (input - self.state) * coefficient;
        self.state
    }

    /// Last output value.
    #[inline]
    pub fn state(&self) -> f64 {
        self.state
    }

    /// Resets the state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
