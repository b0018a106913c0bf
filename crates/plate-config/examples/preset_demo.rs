//! Preset demo: factory presets, TOML serialization, and validation.
//!
//! Run with: cargo run -p plate-config --example preset_demo

use plate_config::{
    FACTORY_PRESET_NAMES, Preset, ReverbParam, get_factory_preset, parse_param_assignment,
};

fn main() {
    println!("=== Factory Presets ===\n");
    for id in FACTORY_PRESET_NAMES {
        if let Some(preset) = get_factory_preset(id) {
            println!(
                "{:<14} decay {:.2}  damping {:.2}  - {}",
                id,
                preset.params.decay,
                preset.params.damping,
                preset.description.as_deref().unwrap_or("")
            );
        }
    }

    println!("\n=== Custom Preset ===\n");
    let preset = Preset::new("Drum Room")
        .with_description("Short and punchy")
        .with_param(ReverbParam::Decay, 0.3)
        .with_param(ReverbParam::PreDelay, 0.0);
    match preset.to_toml() {
        Ok(toml) => println!("{toml}"),
        Err(e) => println!("serialize failed: {e}"),
    }

    println!("=== Command-line Assignments ===\n");
    for assignment in ["decay=0.8", "damping=40%", "Pre-Delay=0.2", "decay=1.5", "size=1"] {
        match parse_param_assignment(assignment) {
            Ok((param, value)) => println!("  {assignment:<16} -> {param} = {value}"),
            Err(e) => println!("  {assignment:<16} -> error: {e}"),
        }
    }
}
