//! Preset file format and operations.

use plate_core::{ReverbParam, ReverbParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::validate_preset;

/// Reverb settings stored in a preset.
///
/// Field names match [`ReverbParam::name`]. Missing fields take the engine
/// defaults; unknown fields are a parse error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PresetParams {
    /// Pre-delay as a fraction of the 4800-sample maximum.
    pub pre_delay: f64,
    /// Input lowpass bandwidth.
    pub pre_filter: f64,
    /// Gain of the first two input diffusers.
    pub input_diffusion_1: f64,
    /// Gain of the last two input diffusers.
    pub input_diffusion_2: f64,
    /// Gain of the modulated tank diffusers.
    pub decay_diffusion_1: f64,
    /// Tank feedback gain.
    pub decay: f64,
    /// Tank lowpass bandwidth.
    pub damping: f64,
}

impl Default for PresetParams {
    fn default() -> Self {
        ReverbParams::default().into()
    }
}

impl From<ReverbParams> for PresetParams {
    fn from(p: ReverbParams) -> Self {
        Self {
            pre_delay: p.pre_delay,
            pre_filter: p.pre_filter,
            input_diffusion_1: p.input_diffusion_1,
            input_diffusion_2: p.input_diffusion_2,
            decay_diffusion_1: p.decay_diffusion_1,
            decay: p.decay,
            damping: p.damping,
        }
    }
}

impl From<PresetParams> for ReverbParams {
    fn from(p: PresetParams) -> Self {
        Self {
            pre_delay: p.pre_delay,
            pre_filter: p.pre_filter,
            input_diffusion_1: p.input_diffusion_1,
            input_diffusion_2: p.input_diffusion_2,
            decay_diffusion_1: p.decay_diffusion_1,
            decay: p.decay,
            damping: p.damping,
        }
    }
}

impl PresetParams {
    /// Reads one parameter.
    pub fn get(&self, param: ReverbParam) -> f64 {
        param.get(&(*self).into())
    }

    /// Writes one parameter, unvalidated.
    pub fn set(&mut self, param: ReverbParam, value: f64) {
        let mut params: ReverbParams = (*self).into();
        param.set(&mut params, value);
        *self = params.into();
    }
}

/// Preset file format for the plate reverb.
///
/// # TOML Format
///
/// ```toml
/// name = "Large Hall"
/// description = "Long, dark tail"
/// sample_rate = 48000
///
/// [params]
/// pre_delay = 0.25
/// decay = 0.9
/// damping = 0.6
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate the preset was voiced at (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Reverb parameters.
    #[serde(default)]
    pub params: PresetParams,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a preset with default parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            params: PresetParams::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace all parameters.
    pub fn with_params(mut self, params: impl Into<PresetParams>) -> Self {
        self.params = params.into();
        self
    }

    /// Set one parameter.
    pub fn with_param(mut self, param: ReverbParam, value: f64) -> Self {
        self.params.set(param, value);
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the sample rate hint and every parameter range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_preset(self)?;
        Ok(())
    }

    /// Validated engine parameters.
    pub fn to_reverb_params(&self) -> Result<ReverbParams, ConfigError> {
        self.validate()?;
        Ok(self.params.into())
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
