//! Integration tests for plate-config.
//!
//! These tests verify end-to-end functionality across modules: presets
//! saved to disk, reloaded, validated, and driven through the engine.

use plate_config::{
    ConfigError, Preset, ReverbParam, ValidationError, factory_presets, get_factory_preset,
    preset_name_from_path,
};
use plate_core::DattorroReverb;
use tempfile::TempDir;

/// Render a short impulse through a preset and return total output energy.
fn impulse_energy(preset: &Preset, len: usize) -> f64 {
    let params = preset.to_reverb_params().expect("valid preset");
    let mut reverb = DattorroReverb::with_params(&params).expect("allocate reverb");
    (0..len)
        .map(|n| {
            let (l, r) = reverb.process_stereo(if n == 0 { 1.0 } else { 0.0 });
            l * l + r * r
        })
        .sum()
}

#[test]
fn test_save_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("hall.toml");

    let original = Preset::new("Hall")
        .with_description("Roundtrip test")
        .with_sample_rate(96000)
        .with_param(ReverbParam::Decay, 0.88)
        .with_param(ReverbParam::PreDelay, 0.3);

    original.save(&path).expect("save creates parent directories");
    let loaded = Preset::load(&path).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(preset_name_from_path(&path).as_deref(), Some("hall"));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = Preset::load(temp_dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_out_of_range_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("wild.toml");
    std::fs::write(
        &path,
        "name = \"Wild\"\n\n[params]\ndecay = 1.5\ninput_diffusion_1 = 0.999\n",
    )
    .unwrap();

    let preset = Preset::load(&path).expect("syntactically valid");
    match preset.to_reverb_params() {
        Err(ConfigError::Validation(ValidationError::Multiple(errors))) => {
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected two range errors, got {other:?}"),
    }
}

#[test]
fn test_every_factory_preset_renders() {
    for preset in factory_presets() {
        let energy = impulse_energy(&preset, 12_000);
        assert!(
            energy.is_finite() && energy > 0.0,
            "preset '{}' produced energy {energy}",
            preset.name
        );
    }
}

#[test]
fn test_longer_decay_rings_longer() {
    let room = get_factory_preset("small_room").unwrap();
    let hall = get_factory_preset("large_hall").unwrap();

    let tail = |preset: &Preset| {
        let params = preset.to_reverb_params().unwrap();
        let mut reverb = DattorroReverb::with_params(&params).unwrap();
        let mut energy = 0.0;
        for n in 0..96_000 {
            let (l, r) = reverb.process_stereo(if n == 0 { 1.0 } else { 0.0 });
            if n >= 48_000 {
                energy += l * l + r * r;
            }
        }
        energy
    };

    assert!(tail(&hall) > tail(&room) * 100.0);
}
