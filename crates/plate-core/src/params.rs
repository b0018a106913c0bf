//! Reverb parameter set and per-parameter metadata.
//!
//! [`ReverbParams`] is a plain snapshot of the seven user-facing controls.
//! [`ReverbParam`] names each control with a stable string id, display
//! label, legal range and default so that presets, command-line overrides
//! and control surfaces can address parameters without hand-written
//! matches on field names.
//!
//! The derived decay-diffusion-2 amount is not a parameter: it is always
//! computed from `decay` by [`decay_diffusion_2_for`].

/// Longest pre-delay in samples (100 ms at the 48 kHz reference rate).
pub const MAX_PRE_DELAY: usize = 4800;

/// Upper bound for the diffusion gains. Keeps every allpass strictly stable.
pub const MAX_DIFFUSION: f64 = 0.99;

/// Derives the decay-diffusion-2 gain from the decay amount.
///
/// `clamp(decay + 0.15, 0.25, 0.50)`: longer tails get denser late
/// diffusion, but never beyond one half.
#[inline]
pub fn decay_diffusion_2_for(decay: f64) -> f64 {
    (decay + 0.15).clamp(0.25, 0.50)
}

/// Snapshot of all user-facing reverb parameters.
///
/// All values are normalized amounts; see [`ReverbParam::range`] for the
/// accepted interval of each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Pre-delay as a fraction of [`MAX_PRE_DELAY`].
    pub pre_delay: f64,
    /// Bandwidth of the input lowpass (1.0 = no filtering).
    pub pre_filter: f64,
    /// Gain of the first two input diffusers.
    pub input_diffusion_1: f64,
    /// Gain of the last two input diffusers.
    pub input_diffusion_2: f64,
    /// Gain of the modulated tank diffusers (applied negated).
    pub decay_diffusion_1: f64,
    /// Tank feedback gain.
    pub decay: f64,
    /// Bandwidth of the tank lowpass (1.0 = no damping).
    pub damping: f64,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            pre_delay: 0.1,
            pre_filter: 0.85,
            input_diffusion_1: 0.75,
            input_diffusion_2: 0.625,
            decay_diffusion_1: 0.70,
            decay: 0.75,
            damping: 0.95,
        }
    }
}

impl ReverbParams {
    /// Returns a copy with every value clamped into its legal range.
    ///
    /// `NaN` values fall back to the parameter's default.
    pub fn sanitized(&self) -> Self {
        let mut out = *self;
        for param in ReverbParam::ALL {
            let value = param.get(self);
            param.set(&mut out, param.clamp(value).unwrap_or(param.default_value()));
        }
        out
    }

    /// The decay-diffusion-2 gain these parameters imply.
    pub fn decay_diffusion_2(&self) -> f64 {
        decay_diffusion_2_for(self.decay)
    }

    pub(crate) fn to_array(self) -> [f64; ReverbParam::COUNT] {
        ReverbParam::ALL.map(|p| p.get(&self))
    }

    pub(crate) fn from_array(values: [f64; ReverbParam::COUNT]) -> Self {
        let mut params = Self::default();
        for (param, value) in ReverbParam::ALL.into_iter().zip(values) {
            param.set(&mut params, value);
        }
        params
    }
}

/// Identifies one user-facing parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReverbParam {
    /// See [`ReverbParams::pre_delay`].
    PreDelay,
    /// See [`ReverbParams::pre_filter`].
    PreFilter,
    /// See [`ReverbParams::input_diffusion_1`].
    InputDiffusion1,
    /// See [`ReverbParams::input_diffusion_2`].
    InputDiffusion2,
    /// See [`ReverbParams::decay_diffusion_1`].
    DecayDiffusion1,
    /// See [`ReverbParams::decay`].
    Decay,
    /// See [`ReverbParams::damping`].
    Damping,
}

impl ReverbParam {
    /// Number of parameters.
    pub const COUNT: usize = 7;

    /// All parameters in signal-flow order.
    pub const ALL: [ReverbParam; Self::COUNT] = [
        Self::PreDelay,
        Self::PreFilter,
        Self::InputDiffusion1,
        Self::InputDiffusion2,
        Self::DecayDiffusion1,
        Self::Decay,
        Self::Damping,
    ];

    /// Position in [`ALL`](Self::ALL).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case identifier used in presets and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreDelay => "pre_delay",
            Self::PreFilter => "pre_filter",
            Self::InputDiffusion1 => "input_diffusion_1",
            Self::InputDiffusion2 => "input_diffusion_2",
            Self::DecayDiffusion1 => "decay_diffusion_1",
            Self::Decay => "decay",
            Self::Damping => "damping",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreDelay => "Pre-delay",
            Self::PreFilter => "Pre-filter",
            Self::InputDiffusion1 => "Input diffusion 1",
            Self::InputDiffusion2 => "Input diffusion 2",
            Self::DecayDiffusion1 => "Decay diffusion 1",
            Self::Decay => "Decay",
            Self::Damping => "Damping",
        }
    }

    /// Accepted `(min, max)` interval.
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::InputDiffusion1 | Self::InputDiffusion2 | Self::DecayDiffusion1 => {
                (0.0, MAX_DIFFUSION)
            }
            _ => (0.0, 1.0),
        }
    }

    /// Value the engine starts with.
    pub fn default_value(self) -> f64 {
        self.get(&ReverbParams::default())
    }

    /// Looks a parameter up by its [`name`](Self::name).
    ///
    /// Matching is case-insensitive and accepts `-` in place of `_`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| {
            let id = p.name();
            id.len() == name.len()
                && id.bytes().zip(name.bytes()).all(|(a, b)| {
                    let b = if b == b'-' { b'_' } else { b.to_ascii_lowercase() };
                    a == b
                })
        })
    }

    /// Clamps `value` into [`range`](Self::range). Returns `None` for `NaN`.
    pub fn clamp(self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let (min, max) = self.range();
        Some(value.clamp(min, max))
    }

    /// Reads this parameter from a snapshot.
    pub fn get(self, params: &ReverbParams) -> f64 {
        match self {
            Self::PreDelay => params.pre_delay,
            Self::PreFilter => params.pre_filter,
            Self::InputDiffusion1 => params.input_diffusion_1,
            Self::InputDiffusion2 => params.input_diffusion_2,
            Self::DecayDiffusion1 => params.decay_diffusion_1,
            Self::Decay => params.decay,
            Self::Damping => params.damping,
        }
    }

    /// Writes this parameter into a snapshot, unclamped.
    pub fn set(self, params: &mut ReverbParams, value: f64) {
        let slot = match self {
            Self::PreDelay => &mut params.pre_delay,
            Self::PreFilter => &mut params.pre_filter,
            Self::InputDiffusion1 => &mut params.input_diffusion_1,
            Self::InputDiffusion2 => &mut params.input_diffusion_2,
            Self::DecayDiffusion1 => &mut params.decay_diffusion_1,
            Self::Decay => &mut params.decay,
            Self::Damping => &mut params.damping,
        };
        *slot = value;
    }
}

impl core::fmt::Display for ReverbParam {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_diffusion_2_derivation() {
        let cases = [
            (0.0, 0.25),
            (0.1, 0.25),
            (0.35, 0.50),
            (0.5, 0.50),
            (1.0, 0.50),
        ];
        for (decay, expected) in cases {
            let got = decay_diffusion_2_for(decay);
            assert!(
                (got - expected).abs() < 1e-12,
                "decay {decay}: expected {expected}, got {got}"
            );
        }
        assert!((decay_diffusion_2_for(0.2) - 0.35).abs() < 1e-12);
    }

    #[test]
    fn names_round_trip() {
        for param in ReverbParam::ALL {
            assert_eq!(ReverbParam::from_name(param.name()), Some(param));
        }
        assert_eq!(
            ReverbParam::from_name("Decay-Diffusion-1"),
            Some(ReverbParam::DecayDiffusion1)
        );
        assert_eq!(ReverbParam::from_name("size"), None);
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, param) in ReverbParam::ALL.into_iter().enumerate() {
            assert_eq!(param.index(), i);
        }
    }

    #[test]
    fn defaults_match_struct_default() {
        let defaults = ReverbParams::default();
        assert_eq!(ReverbParam::Decay.default_value(), defaults.decay);
        assert_eq!(ReverbParam::PreDelay.default_value(), 0.1);
        assert!((defaults.decay_diffusion_2() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn sanitized_clamps_and_replaces_nan() {
        let params = ReverbParams {
            decay: 3.0,
            damping: -1.0,
            input_diffusion_1: 1.0,
            pre_filter: f64::NAN,
            ..ReverbParams::default()
        };
        let clean = params.sanitized();
        assert_eq!(clean.decay, 1.0);
        assert_eq!(clean.damping, 0.0);
        assert_eq!(clean.input_diffusion_1, MAX_DIFFUSION);
        assert_eq!(clean.pre_filter, 0.85);
    }

    #[test]
    fn array_conversion_preserves_order() {
        let params = ReverbParams {
            pre_delay: 0.2,
            damping: 0.4,
            ..ReverbParams::default()
        };
        let array = params.to_array();
        assert_eq!(array[0], 0.2);
        assert_eq!(array[6], 0.4);
        assert_eq!(ReverbParams::from_array(array), params);
    }
}
