//! Parameter listing.

use plate_config::{ReverbParam, ReverbParams};

pub fn run() -> anyhow::Result<()> {
    let defaults = ReverbParams::default();

    println!("Reverb Parameters:");
    println!("==================");
    println!(
        "  {:20} {:20} {:>6} {:>6} {:>8}",
        "NAME", "LABEL", "MIN", "MAX", "DEFAULT"
    );
    for param in ReverbParam::ALL {
        let (min, max) = param.range();
        println!(
            "  {:20} {:20} {:>6.2} {:>6.2} {:>8.3}",
            param.name(),
            param.label(),
            min,
            max,
            param.get(&defaults)
        );
    }
    println!();
    println!(
        "  decay_diffusion_2 is derived: clamp(decay + 0.15, 0.25, 0.50) = {:.3} at default decay",
        defaults.decay_diffusion_2()
    );
    println!("  Values accept plain numbers or percentages, e.g. --param decay=85%");

    Ok(())
}
