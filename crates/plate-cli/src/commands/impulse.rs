//! Impulse response rendering.

use super::common::{linear_to_db, parse_param, resolve_params, warn_on_sample_rate};
use crate::wav::{check_bit_depth, write_wav_stereo};
use clap::Args;
use plate_config::ReverbParam;
use plate_core::DattorroReverb;
use std::path::PathBuf;

#[derive(Args)]
pub struct ImpulseArgs {
    /// Output WAV file (stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides (e.g., "damping=0.4")
    #[arg(long, value_parser = parse_param, number_of_values = 1)]
    param: Vec<(ReverbParam, f64)>,

    /// Length of the rendered response in seconds
    #[arg(long, default_value = "5.0")]
    seconds: f64,

    /// Sample rate written to the file header
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ImpulseArgs) -> anyhow::Result<()> {
    check_bit_depth(args.bit_depth)?;
    if args.sample_rate == 0 {
        anyhow::bail!("--sample-rate must be positive");
    }
    if !args.seconds.is_finite() || args.seconds <= 0.0 {
        anyhow::bail!("--seconds must be positive, got {}", args.seconds);
    }
    warn_on_sample_rate(args.sample_rate);

    let params = resolve_params(args.preset.as_deref(), &args.param)?;
    let mut reverb = DattorroReverb::with_params(&params)?;

    let len = (args.seconds * f64::from(args.sample_rate)).round().max(1.0) as usize;
    let mut input = vec![0.0; len];
    input[0] = 1.0;
    let mut left = vec![0.0; len];
    let mut right = vec![0.0; len];
    reverb.process_block(&input, &mut left, &mut right)?;

    let onset = left
        .iter()
        .zip(&right)
        .position(|(&l, &r)| l != 0.0 || r != 0.0);
    match onset {
        Some(n) => println!(
            "Onset at sample {} ({:.2} ms)",
            n,
            n as f64 * 1000.0 / f64::from(args.sample_rate)
        ),
        None => println!("No output within {} samples", len),
    }

    let energy: f64 = left.iter().chain(&right).map(|s| s * s).sum();
    println!("Total energy {:.1} dB", linear_to_db(energy.sqrt()));

    write_wav_stereo(&args.output, &left, &right, args.sample_rate, args.bit_depth)?;
    tracing::info!(path = %args.output.display(), samples = len, "impulse response written");
    println!("Wrote {} ({} samples)", args.output.display(), len);

    Ok(())
}
