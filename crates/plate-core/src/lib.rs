//! Plate Core - Dattorro plate reverb engine
//!
//! A mono-in, stereo-out feedback delay network after Jon Dattorro's plate
//! reverberator, built from three small DSP primitives. Everything is
//! allocated at construction; the per-sample path is allocation-free and
//! suitable for a real-time audio callback.
//!
//! # Building Blocks
//!
//! - [`RingDelay`] - Power-of-two circular delay line with a movable main tap
//!   and named extra [`Tap`]s
//! - [`AllpassDiffuser`] - Schroeder allpass on a [`RingDelay`] loop
//! - [`DampingFilter`] - One-pole lowpass driven by a bandwidth coefficient
//!
//! # Engine
//!
//! - [`DattorroReverb`] - Pre-delay, pre-filter, four input diffusers and a
//!   two-half modulated tank with fixed stereo output taps
//! - [`ReverbParams`] / [`ReverbParam`] - Parameter snapshot and metadata
//! - [`ReverbControls`] - Lock-free snapshot hand-off from a control thread
//!   (requires `std`)
//!
//! # Example
//!
//! ```rust
//! use plate_core::DattorroReverb;
//!
//! let mut reverb = DattorroReverb::new()?;
//! reverb.set_decay(0.8);
//! reverb.set_damping(0.6);
//!
//! for &sample in &[1.0, 0.0, 0.0, 0.0] {
//!     reverb.process(sample);
//!     let (left, right) = (reverb.left(), reverb.right());
//!     # let _ = (left, right);
//! }
//! # Ok::<(), plate_core::ReverbError>(())
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build against `alloc` only. The
//! cross-thread [`ReverbControls`] are unavailable in that configuration.
//!
//! ```toml
//! [dependencies]
//! plate-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Features
//!
//! - `std` (default): `std::error::Error` impls and [`ReverbControls`]
//! - `tracing`: debug events on construction, reset and parameter clamping

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
#[cfg(feature = "std")]
pub mod controls;
pub mod damping;
pub mod delay;
pub mod error;
pub mod params;
pub mod reverb;

pub use allpass::AllpassDiffuser;
#[cfg(feature = "std")]
pub use controls::ReverbControls;
pub use damping::DampingFilter;
pub use delay::{RingDelay, Tap, capacity_for};
pub use error::ReverbError;
pub use params::{
    MAX_DIFFUSION, MAX_PRE_DELAY, ReverbParam, ReverbParams, decay_diffusion_2_for,
};
pub use reverb::{DattorroReverb, REFERENCE_SAMPLE_RATE};
