//! Shared CLI helpers used across multiple commands.

use indicatif::{ProgressBar, ProgressStyle};
use plate_config::{
    Preset, ReverbParam, ReverbParams, find_preset, get_factory_preset, parse_param_assignment,
};
use plate_core::REFERENCE_SAMPLE_RATE;
use std::path::PathBuf;

/// Parse a `name=value` parameter override for clap's `value_parser`.
pub fn parse_param(s: &str) -> Result<(ReverbParam, f64), String> {
    parse_param_assignment(s).map_err(|e| e.to_string())
}

/// Load a preset by name or path.
///
/// Searches in this order:
/// 1. Factory presets (by id or display name)
/// 2. User and system preset directories (by name)
/// 3. File path
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    if let Some(path) = find_preset(name) {
        return Ok(Preset::load(&path)?);
    }

    let path = PathBuf::from(name);
    if path.exists() {
        return Ok(Preset::load(&path)?);
    }

    anyhow::bail!("Preset '{name}' not found. Use 'plate presets' to see available presets.")
}

/// Resolve the engine parameters from an optional preset plus overrides.
///
/// Overrides are applied after the preset, in command-line order.
pub fn resolve_params(
    preset: Option<&str>,
    overrides: &[(ReverbParam, f64)],
) -> anyhow::Result<ReverbParams> {
    let mut params = match preset {
        Some(name) => {
            let preset = load_preset(name)?;
            tracing::info!(preset = %preset.name, "loaded preset");
            preset.to_reverb_params()?
        }
        None => ReverbParams::default(),
    };

    for &(param, value) in overrides {
        tracing::debug!(%param, value, "parameter override");
        param.set(&mut params, value);
    }

    Ok(params)
}

/// Log a warning when running at a rate the delay lengths were not tuned for.
pub fn warn_on_sample_rate(sample_rate: u32) {
    if f64::from(sample_rate) != REFERENCE_SAMPLE_RATE {
        tracing::warn!(
            sample_rate,
            reference = REFERENCE_SAMPLE_RATE,
            "delay lengths are tuned for 48 kHz and are not rescaled; \
             room size and modulation rate will shift"
        );
    }
}

/// Progress bar over `len` samples.
pub fn sample_progress(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb
}

/// Root-mean-square level.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f64).sqrt()
}

/// Absolute peak level.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
}

/// Linear amplitude to dBFS, floored at -120.
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        -120.0
    } else {
        (20.0 * linear.log10()).max(-120.0)
    }
}
