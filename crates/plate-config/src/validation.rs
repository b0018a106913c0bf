//! Parameter and preset validation.
//!
//! Presets and command-line overrides address reverb parameters by their
//! string ids (see [`ReverbParam::name`]). This module resolves those ids,
//! parses values, and rejects anything outside the engine's legal ranges.
//! The engine itself clamps silently; validation exists so that a preset
//! file with a typo or a wild value fails loudly instead.
//!
//! # Example
//!
//! ```rust
//! use plate_config::{parse_param_assignment, validate_param_value, ReverbParam};
//!
//! let (param, value) = parse_param_assignment("decay=85%").unwrap();
//! assert_eq!(param, ReverbParam::Decay);
//! assert!((value - 0.85).abs() < 1e-12);
//!
//! assert!(validate_param_value(ReverbParam::InputDiffusion1, 1.2).is_err());
//! ```

use plate_core::ReverbParam;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Sample rate hint of zero.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Resolves a parameter id, accepting `-` for `_` and any letter case.
pub fn resolve_param(name: &str) -> ValidationResult<ReverbParam> {
    ReverbParam::from_name(name.trim())
        .ok_or_else(|| ValidationError::UnknownParameter(name.trim().to_string()))
}

/// Parse a parameter value from a string.
///
/// Accepts plain numbers (`"0.85"`) and percentages (`"85%"`, read as 0.85).
pub fn parse_param_value(param_name: &str, value_str: &str) -> ValidationResult<f64> {
    let s = value_str.trim();
    let (number, scale) = match s.strip_suffix('%') {
        Some(v) => (v.trim(), 0.01),
        None => (s, 1.0),
    };

    let value = number
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidFormat {
            param: param_name.to_string(),
            reason: format!("cannot parse '{}' as number", number),
        })?;

    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            param: param_name.to_string(),
            reason: format!("'{}' is not a finite number", number),
        });
    }

    Ok(value * scale)
}

/// Checks `value` against the parameter's legal range.
pub fn validate_param_value(param: ReverbParam, value: f64) -> ValidationResult<()> {
    let (min, max) = param.range();
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError::OutOfRange {
            param: param.name().to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Parses and validates a `name=value` assignment.
pub fn parse_param_assignment(assignment: &str) -> ValidationResult<(ReverbParam, f64)> {
    let Some((name, value)) = assignment.split_once('=') else {
        return Err(ValidationError::InvalidFormat {
            param: assignment.to_string(),
            reason: "expected name=value".to_string(),
        });
    };
    let param = resolve_param(name)?;
    let value = parse_param_value(param.name(), value)?;
    validate_param_value(param, value)?;
    Ok((param, value))
}

/// Validate a preset's sample rate hint and every parameter value.
///
/// All problems are collected; a single one is returned as-is, several as
/// [`ValidationError::Multiple`].
pub fn validate_preset(preset: &crate::Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if preset.sample_rate == 0 {
        errors.push(ValidationError::InvalidSampleRate(preset.sample_rate));
    }

    for param in ReverbParam::ALL {
        if let Err(e) = validate_param_value(param, preset.params.get(param)) {
            errors.push(e);
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
