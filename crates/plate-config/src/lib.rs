//! Configuration and preset management for the plate reverb.
//!
//! # Features
//!
//! - **Preset System**: Load and save reverb settings as TOML files
//! - **Validation**: Resolve parameter ids and reject out-of-range values
//! - **Paths**: Platform-specific preset directories
//! - **Factory Presets**: Built-in voicings from small rooms to long halls
//!
//! # Example
//!
//! ```rust,no_run
//! use plate_config::{Preset, ReverbParam, user_presets_dir};
//! use plate_core::DattorroReverb;
//!
//! let preset = Preset::new("Big Hall")
//!     .with_description("Long, dark tail")
//!     .with_param(ReverbParam::Decay, 0.9)
//!     .with_param(ReverbParam::Damping, 0.5);
//!
//! preset.save(user_presets_dir().join("big_hall.toml")).unwrap();
//!
//! let reverb = DattorroReverb::with_params(&preset.to_reverb_params().unwrap()).unwrap();
//! # let _ = reverb;
//! ```

mod error;
mod preset;

/// Platform-specific preset directories.
#[cfg(feature = "std")]
pub mod paths;

/// Parameter and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_presets, get_factory_preset, is_factory_preset,
};
#[cfg(feature = "std")]
pub use paths::{
    ensure_user_presets_dir, find_preset, list_all_presets, preset_name_from_path,
    system_presets_dir, user_presets_dir,
};
pub use preset::{Preset, PresetParams};
pub use validation::{
    ValidationError, ValidationResult, parse_param_assignment, parse_param_value, resolve_param,
    validate_param_value, validate_preset,
};

/// Re-export the parameter ids presets are keyed by.
pub use plate_core::{ReverbParam, ReverbParams};
