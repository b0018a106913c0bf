//! Power-of-two circular delay line with a main tap and named extra taps.
//!
//! [`RingDelay`] is the single buffer abstraction used throughout the reverb:
//! plain delays (pre-delay, pre/post-damping) use it directly and every
//! [`AllpassDiffuser`](crate::AllpassDiffuser) embeds one.
//!
//! # Addressing
//!
//! The line has no write pointer of its own. Callers pass the engine's sample
//! counter `t`; the write slot is `t & mask` and a tap with delay `d` reads
//! slot `(t + offset) & mask` where `offset = (capacity - d) & mask`. Because
//! capacity is a power of two it divides the counter's wrap-around period, so
//! a wrapping `usize` counter stays consistent across overflow.
//!
//! ```text
//!            write t
//!               v
//!  [ . . . x . . W . . . . ]     x = value written at t - d
//!          ^
//!     read(tap(d), t)
//! ```
//!
//! # Taps
//!
//! The main tap lives inside the line and may be moved at runtime
//! ([`set_delay`](RingDelay::set_delay), [`modulate`](RingDelay::modulate)).
//! Extra read points are [`Tap`] handles created by [`RingDelay::tap`]; the
//! owner stores them in named fields and passes them back to
//! [`RingDelay::read`].

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use crate::ReverbError;

/// Returns the buffer capacity needed to hold `max_delay` samples.
///
/// This is the smallest power of two `>= max_delay` (and at least 1), or
/// `None` if that power of two does not fit in `usize`.
#[inline]
pub fn capacity_for(max_delay: usize) -> Option<usize> {
    max_delay.max(1).checked_next_power_of_two()
}

/// A fixed read point into one [`RingDelay`].
///
/// Created with [`RingDelay::tap`], which validates the delay against the
/// line's capacity. A tap is only meaningful for the line that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    offset: usize,
    delay: usize,
    mask: usize,
}

impl Tap {
    fn new(delay: usize, capacity: usize) -> Result<Self, ReverbError> {
        if delay >= capacity {
            return Err(ReverbError::InvalidDelay { delay, capacity });
        }
        let mask = capacity - 1;
        Ok(Self {
            offset: (capacity - delay) & mask,
            delay,
            mask,
        })
    }

    /// Delay of this tap in samples.
    #[inline]
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Offset ahead of the write position, in `[0, capacity - 1]`.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Circular delay line sized to a power of two.
///
/// Storage is allocated once in the constructor; reads, writes and tap
/// changes never allocate.
///
/// # Example
///
/// ```rust
/// use plate_core::RingDelay;
///
/// let mut line = RingDelay::with_delay(100).unwrap();
/// assert_eq!(line.capacity(), 128);
///
/// line.write_then_read(0, 1.0);
/// for t in 1..100 {
///     line.write_then_read(t, 0.0);
/// }
/// assert_eq!(line.write_then_read(100, 0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct RingDelay {
    buffer: Vec<f64>,
    mask: usize,
    main: Tap,
}

impl RingDelay {
    /// Creates a zeroed line able to hold `max_delay` samples.
    ///
    /// Capacity is [`capacity_for(max_delay)`](capacity_for); the main tap
    /// starts at delay 0. Fails with [`ReverbError::Allocation`] if the
    /// storage cannot be obtained.
    pub fn new(max_delay: usize) -> Result<Self, ReverbError> {
        let capacity =
            capacity_for(max_delay).ok_or(ReverbError::Allocation { samples: max_delay })?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| ReverbError::Allocation { samples: capacity })?;
        buffer.resize(capacity, 0.0);

        Ok(Self {
            buffer,
            mask: capacity - 1,
            main: Tap::new(0, capacity)?,
        })
    }

    /// Creates a line whose main tap is set to exactly `delay` samples.
    ///
    /// Room is allocated for `delay + 1` samples so the nominal length is
    /// always a legal tap, even when `delay` is itself a power of two.
    pub fn with_delay(delay: usize) -> Result<Self, ReverbError> {
        let mut line = Self::new(delay.saturating_add(1))?;
        line.set_delay(delay)?;
        Ok(line)
    }

    /// Buffer capacity in samples (a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current delay of the main tap in samples.
    #[inline]
    pub fn delay(&self) -> usize {
        self.main.delay
    }

    /// Moves the main tap to `delay` samples behind the write head.
    ///
    /// Rejects delays outside `[0, capacity - 1]` and leaves the tap as it was.
    pub fn set_delay(&mut self, delay: usize) -> Result<(), ReverbError> {
        self.main = Tap::new(delay, self.capacity())?;
        Ok(())
    }

    /// The main tap as a handle, for restoring it later with
    /// [`set_tap`](Self::set_tap).
    #[inline]
    pub fn main_tap(&self) -> Tap {
        self.main
    }

    /// Moves the main tap to a handle previously created for this line.
    pub fn set_tap(&mut self, tap: Tap) {
        debug_assert_eq!(tap.mask, self.mask, "tap belongs to a different delay line");
        self.main = tap;
    }

    /// Creates an extra read tap `delay` samples behind the write head.
    pub fn tap(&self, delay: usize) -> Result<Tap, ReverbError> {
        Tap::new(delay, self.capacity())
    }

    /// Shifts the main tap by `delta` samples (positive lengthens the delay).
    ///
    /// The result saturates to `[1, capacity - 1]`, so a runaway modulation
    /// source can never collapse the tap onto the write head.
    pub fn modulate(&mut self, delta: isize) {
        let max = self.mask.max(1) as isize;
        let target = (self.main.delay as isize).saturating_add(delta).clamp(1, max);
        if let Ok(tap) = Tap::new(target as usize, self.capacity()) {
            self.main = tap;
        }
    }

    /// Writes `value` at counter `t` and returns the main tap for the same `t`.
    ///
    /// With a zero-delay main tap this returns `value` itself.
    #[inline]
    pub fn write_then_read(&mut self, t: usize, value: f64) -> f64 {
        self.write(t, value);
        self.read_main(t)
    }

    /// Writes `value` at counter `t`.
    #[inline]
    pub fn write(&mut self, t: usize, value: f64) {
        self.buffer[t & self.mask] = value;
    }

    /// Reads the main tap at counter `t`.
    #[inline]
    pub fn read_main(&self, t: usize) -> f64 {
        self.buffer[t.wrapping_add(self.main.offset) & self.mask]
    }

    /// Reads an extra tap at counter `t`.
    #[inline]
    pub fn read(&self, tap: Tap, t: usize) -> f64 {
        debug_assert_eq!(tap.mask, self.mask, "tap belongs to a different delay line");
        self.buffer[t.wrapping_add(tap.offset) & self.mask]
    }

    /// Reads the value written `delay` samples before `t`, ignoring all taps.
    ///
    /// `delay` is taken modulo the capacity.
    #[inline]
    pub fn read_at(&self, t: usize, delay: usize) -> f64 {
        self.buffer[t.wrapping_sub(delay) & self.mask]
    }

    /// Zeroes the stored samples. Tap positions are kept.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}
