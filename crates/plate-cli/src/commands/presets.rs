//! Preset listing.

use super::common::load_preset;
use clap::Args;
use plate_config::{
    FACTORY_PRESET_NAMES, Preset, ReverbParam, get_factory_preset, list_all_presets,
    preset_name_from_path, user_presets_dir,
};

#[derive(Args)]
pub struct PresetsArgs {
    /// Show the parameters of one preset (name or path)
    #[arg(long, value_name = "NAME")]
    show: Option<String>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.show {
        Some(name) => show_preset(&name),
        None => {
            list_presets();
            Ok(())
        }
    }
}

fn list_presets() {
    println!("Factory Presets:");
    println!("================");
    for id in FACTORY_PRESET_NAMES {
        if let Some(preset) = get_factory_preset(id) {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:16} - {}", id, desc);
        }
    }
    println!();

    println!("User Presets:");
    println!("=============");
    let files = list_all_presets();
    if files.is_empty() {
        println!("  (none)");
        println!("  Save preset files to {}", user_presets_dir().display());
    }
    for path in files {
        let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
        match Preset::load(&path) {
            Ok(preset) => println!(
                "  {:16} - {}",
                name,
                preset.description.as_deref().unwrap_or("")
            ),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable preset");
            }
        }
    }
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    println!("{}", preset.name);
    if let Some(desc) = &preset.description {
        println!("  {desc}");
    }
    println!("  sample rate: {} Hz", preset.sample_rate);
    println!();
    for param in ReverbParam::ALL {
        println!("  {:20} {:.3}", param.name(), preset.params.get(param));
    }

    if let Err(e) = preset.validate() {
        println!();
        println!("  warning: {e}");
    }

    Ok(())
}
