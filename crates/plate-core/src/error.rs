//! Error type for engine construction and tap configuration.

/// Errors reported by delay lines and the reverb engine.
///
/// The per-sample path never fails; errors only arise while building
/// delay lines or reconfiguring taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverbError {
    /// Sample storage for a delay line could not be allocated.
    Allocation {
        /// Number of samples that were requested.
        samples: usize,
    },
    /// A tap delay outside `[0, capacity - 1]` was requested.
    InvalidDelay {
        /// The rejected delay in samples.
        delay: usize,
        /// Capacity of the delay line the tap belongs to.
        capacity: usize,
    },
    /// Block processing was given slices of different lengths.
    BlockLength {
        /// Input slice length.
        input: usize,
        /// Left output slice length.
        left: usize,
        /// Right output slice length.
        right: usize,
    },
}

impl core::fmt::Display for ReverbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Allocation { samples } => {
                write!(f, "failed to allocate {samples} samples of delay storage")
            }
            Self::InvalidDelay { delay, capacity } => write!(
                f,
                "tap delay {delay} out of range for delay line of capacity {capacity} (max {})",
                capacity.saturating_sub(1)
            ),
            Self::BlockLength { input, left, right } => write!(
                f,
                "block length mismatch: input {input}, left {left}, right {right}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReverbError {}
