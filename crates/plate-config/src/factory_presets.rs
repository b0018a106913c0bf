//! Factory presets bundled with the plate library.
//!
//! Embedded TOML, always available without external files. `plate` is the
//! reference voicing; the others move decay, damping and pre-delay to cover
//! small rooms through long halls.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "plate",
    "small_room",
    "vocal_plate",
    "large_hall",
    "dark_chamber",
    "shimmer_wash",
];

/// TOML content for factory presets, keyed by [`FACTORY_PRESET_NAMES`].
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("plate", PLATE_PRESET),
    ("small_room", SMALL_ROOM_PRESET),
    ("vocal_plate", VOCAL_PLATE_PRESET),
    ("large_hall", LARGE_HALL_PRESET),
    ("dark_chamber", DARK_CHAMBER_PRESET),
    ("shimmer_wash", SHIMMER_WASH_PRESET),
];

/// Reference settings from the 1997 paper.
const PLATE_PRESET: &str = r#"
name = "Plate"
description = "Reference plate voicing"
sample_rate = 48000

[params]
pre_delay = 0.1
pre_filter = 0.85
input_diffusion_1 = 0.75
input_diffusion_2 = 0.625
decay_diffusion_1 = 0.7
decay = 0.75
damping = 0.95
"#;

const SMALL_ROOM_PRESET: &str = r#"
name = "Small Room"
description = "Short, tight ambience"
sample_rate = 48000

[params]
pre_delay = 0.02
pre_filter = 0.9
input_diffusion_1 = 0.7
input_diffusion_2 = 0.6
decay_diffusion_1 = 0.6
decay = 0.35
damping = 0.7
"#;

const VOCAL_PLATE_PRESET: &str = r#"
name = "Vocal Plate"
description = "Bright plate with a clear pre-delay gap"
sample_rate = 48000

[params]
pre_delay = 0.4
pre_filter = 0.95
input_diffusion_1 = 0.75
input_diffusion_2 = 0.625
decay_diffusion_1 = 0.7
decay = 0.6
damping = 0.98
"#;

const LARGE_HALL_PRESET: &str = r#"
name = "Large Hall"
description = "Long, smooth tail"
sample_rate = 48000

[params]
pre_delay = 0.25
pre_filter = 0.8
input_diffusion_1 = 0.8
input_diffusion_2 = 0.7
decay_diffusion_1 = 0.75
decay = 0.9
damping = 0.6
"#;

const DARK_CHAMBER_PRESET: &str = r#"
name = "Dark Chamber"
description = "Heavily damped, muffled reflections"
sample_rate = 48000

[params]
pre_delay = 0.05
pre_filter = 0.5
input_diffusion_1 = 0.75
input_diffusion_2 = 0.625
decay_diffusion_1 = 0.7
decay = 0.7
damping = 0.25
"#;

const SHIMMER_WASH_PRESET: &str = r#"
name = "Shimmer Wash"
description = "Near-infinite sustain for pads"
sample_rate = 48000

[params]
pre_delay = 0.0
pre_filter = 1.0
input_diffusion_1 = 0.85
input_diffusion_2 = 0.75
decay_diffusion_1 = 0.8
decay = 0.97
damping = 0.85
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use plate_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by id or display name.
///
/// Matching is case-insensitive; `"large_hall"` and `"Large Hall"` both work.
///
/// # Example
///
/// ```rust
/// use plate_config::get_factory_preset;
///
/// let preset = get_factory_preset("Large Hall").unwrap();
/// assert_eq!(preset.params.decay, 0.9);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    for (preset_name, toml) in FACTORY_PRESETS_TOML {
        if preset_name.to_lowercase() == name_lower {
            return Preset::from_toml(toml).ok();
        }
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Check if a name refers to a factory preset (case-insensitive).
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_core::ReverbParams;

    #[test]
    fn test_factory_presets_load() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESET_NAMES.len());

        let names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Plate"));
        assert!(names.contains(&"Large Hall"));
    }

    #[test]
    fn test_names_match_table() {
        let table: Vec<_> = FACTORY_PRESETS_TOML.iter().map(|(n, _)| *n).collect();
        assert_eq!(table, FACTORY_PRESET_NAMES);
    }

    #[test]
    fn test_all_factory_presets_valid() {
        for preset in factory_presets() {
            assert!(
                preset.validate().is_ok(),
                "factory preset '{}' failed validation",
                preset.name
            );
            assert!(preset.description.is_some(), "'{}' lacks a description", preset.name);
            assert_eq!(preset.sample_rate, 48000);
        }
    }

    #[test]
    fn test_plate_is_engine_default() {
        let preset = get_factory_preset("plate").unwrap();
        assert_eq!(preset.to_reverb_params().unwrap(), ReverbParams::default());
    }

    #[test]
    fn test_get_factory_preset() {
        assert!(get_factory_preset("small_room").is_some());
        assert!(get_factory_preset("SMALL_ROOM").is_some());
        assert!(get_factory_preset("Small Room").is_some());
        assert!(get_factory_preset("nonexistent").is_none());
    }

    #[test]
    fn test_is_factory_preset() {
        assert!(is_factory_preset("dark_chamber"));
        assert!(is_factory_preset("Dark Chamber"));
        assert!(!is_factory_preset("my_custom_preset"));
    }
}
