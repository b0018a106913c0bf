//! Schroeder allpass diffuser for reverb input and tank diffusion.
//!
//! Passes every frequency at unit magnitude while smearing the phase, which
//! turns a sharp transient into a dense cloud of echoes without coloring the
//! tone. The gain is supplied per call so the engine can drive several
//! diffusers from shared parameters, including the negated gain used by the
//! tank's first decay diffuser.
//!
//! ```text
//!             +---------(-g)---------+
//!             |                      |
//! x ---(+)----+---> [ z^-D ] ---+---(+)---> y
//!       ^                       |
//!       +----------(+g)---------+ (on the written value)
//! ```

use crate::ReverbError;
use crate::delay::{RingDelay, Tap};

/// Schroeder allpass built on one [`RingDelay`] main tap.
///
/// # Example
///
/// ```rust
/// use plate_core::AllpassDiffuser;
///
/// let mut ap = AllpassDiffuser::new(142).unwrap();
/// let first = ap.process(0, 0.75, 1.0);
/// assert_eq!(first, 0.75);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassDiffuser {
    line: RingDelay,
}

impl AllpassDiffuser {
    /// Creates a diffuser with a `delay`-sample loop.
    pub fn new(delay: usize) -> Result<Self, ReverbError> {
        Ok(Self {
            line: RingDelay::with_delay(delay)?,
        })
    }

    /// Processes one sample at counter `t` with the given gain.
    ///
    /// `feedback = input - gain * delayed` is written into the loop and
    /// `delayed + gain * feedback` is returned. Stable for `|gain| < 1`.
    #[inline]
    pub fn process(&mut self, t: usize, gain: f64, input: f64) -> f64 {
        let delayed = self.line.read_main(t);
        let feedback = input + delayed * -gain;
        self.line.write(t, feedback);
        delayed + feedback * gain
    }

    /// Creates an extra read tap into the diffuser's loop.
    pub fn tap(&self, delay: usize) -> Result<Tap, ReverbError> {
        self.line.tap(delay)
    }

    /// Reads an extra tap at counter `t`.
    #[inline]
    pub fn read(&self, tap: Tap, t: usize) -> f64 {
        self.line.read(tap, t)
    }

    /// Shifts the loop length by `delta` samples. See [`RingDelay::modulate`].
    #[inline]
    pub fn modulate(&mut self, delta: isize) {
        self.line.modulate(delta);
    }

    /// Resets the loop length to `delay` samples.
    pub fn set_delay(&mut self, delay: usize) -> Result<(), ReverbError> {
        self.line.set_delay(delay)
    }

    /// The loop's current main tap.
    #[inline]
    pub fn main_tap(&self) -> Tap {
        self.line.main_tap()
    }

    /// Restores a loop length saved with [`main_tap`](Self::main_tap).
    pub fn set_tap(&mut self, tap: Tap) {
        self.line.set_tap(tap);
    }

    /// Current loop length in samples.
    #[inline]
    pub fn delay(&self) -> usize {
        self.line.delay()
    }

    /// Borrow the underlying delay line.
    pub fn line(&self) -> &RingDelay {
        &self.line
    }

    /// Clears the loop contents.
    pub fn clear(&mut self) {
        self.line.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_response_shape() {
        let mut ap = AllpassDiffuser::new(10).unwrap();
        let g = 0.5;

        let mut out = Vec::new();
        for t in 0..25 {
            let x = if t == 0 { 1.0 } else { 0.0 };
            out.push(ap.process(t, g, x));
        }

        // Direct path g, then (1 - g^2) after one loop, then -g(1 - g^2).
        assert!((out[0] - g).abs() < 1e-12);
        assert!(out[1..10].iter().all(|&v| v == 0.0));
        assert!((out[10] - (1.0 - g * g)).abs() < 1e-12);
        assert!((out[20] - (-g * (1.0 - g * g))).abs() < 1e-12);
    }

    #[test]
    fn negated_gain_flips_direct_path() {
        let mut pos = AllpassDiffuser::new(8).unwrap();
        let mut neg = AllpassDiffuser::new(8).unwrap();
        assert_eq!(pos.process(0, 0.7, 1.0), 0.7);
        assert_eq!(neg.process(0, -0.7, 1.0), -0.7);
    }

    #[test]
    fn energy_is_preserved() {
        let mut ap = AllpassDiffuser::new(50).unwrap();
        let g = 0.6;
        let mut e_in = 0.0;
        let mut e_out = 0.0;
        for t in 0..50_000 {
            let x = if t < 100 { 1.0 } else { 0.0 };
            let y = ap.process(t, g, x);
            e_in += x * x;
            e_out += y * y;
        }
        assert!(
            (e_out / e_in - 1.0).abs() < 1e-9,
            "energy ratio {} should be 1",
            e_out / e_in
        );
    }

    #[test]
    fn extra_tap_reads_loop_contents() {
        let mut ap = AllpassDiffuser::new(100).unwrap();
        let tap = ap.tap(30).unwrap();
        ap.process(0, 0.5, 1.0);
        for t in 1..30 {
            ap.process(t, 0.5, 0.0);
        }
        // The loop holds `input` at t = 0.
        assert_eq!(ap.read(tap, 30), 1.0);
    }

    #[test]
    fn clear_silences() {
        let mut ap = AllpassDiffuser::new(10).unwrap();
        for t in 0..20 {
            ap.process(t, 0.5, 1.0);
        }
        ap.clear();
        assert_eq!(ap.process(20, 0.5, 0.0), 0.0);
    }
}
