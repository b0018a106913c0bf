//! File-based reverb processing command.

use super::common::{
    linear_to_db, parse_param, peak, resolve_params, rms, sample_progress, warn_on_sample_rate,
};
use crate::wav::{check_bit_depth, read_wav_mono, write_wav_stereo};
use clap::Args;
use plate_config::ReverbParam;
use plate_core::DattorroReverb;
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (multi-channel input is mixed to mono)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter overrides (e.g., "decay=0.9"), applied after the preset
    #[arg(long, value_parser = parse_param, number_of_values = 1)]
    param: Vec<(ReverbParam, f64)>,

    /// Wet/dry mix (0 = dry only, 1 = reverb only)
    #[arg(long, default_value = "1.0")]
    mix: f64,

    /// Seconds of silence appended so the tail can ring out
    #[arg(long, default_value = "2.0")]
    tail: f64,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    check_bit_depth(args.bit_depth)?;
    if !(0.0..=1.0).contains(&args.mix) {
        anyhow::bail!("--mix must be between 0 and 1, got {}", args.mix);
    }
    if !args.tail.is_finite() || args.tail < 0.0 {
        anyhow::bail!("--tail must be a non-negative number of seconds, got {}", args.tail);
    }
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }

    tracing::info!(path = %args.input.display(), "reading input");
    let (dry, spec) = read_wav_mono(&args.input)?;
    let sample_rate = spec.sample_rate;
    tracing::info!(
        samples = dry.len(),
        channels = spec.channels,
        sample_rate,
        seconds = dry.len() as f64 / f64::from(sample_rate),
        "input loaded"
    );
    warn_on_sample_rate(sample_rate);

    let params = resolve_params(args.preset.as_deref(), &args.param)?;
    let mut reverb = DattorroReverb::with_params(&params)?;

    let tail_samples = (args.tail * f64::from(sample_rate)).round() as usize;
    let total = dry.len() + tail_samples;
    let mut input = dry;
    input.resize(total, 0.0);

    let mut left = vec![0.0; total];
    let mut right = vec![0.0; total];

    let pb = sample_progress(total);
    let block = args.block_size;
    for ((x, l), r) in input
        .chunks(block)
        .zip(left.chunks_mut(block))
        .zip(right.chunks_mut(block))
    {
        reverb.process_block(x, l, r)?;
        pb.inc(x.len() as u64);
    }
    pb.finish_and_clear();

    let wet_gain = args.mix;
    let dry_gain = 1.0 - args.mix;
    for ((&x, l), r) in input.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
        *l = dry_gain * x + wet_gain * *l;
        *r = dry_gain * x + wet_gain * *r;
    }

    println!("Stats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&input)),
        linear_to_db(peak(&input))
    );
    println!(
        "  Left:   RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&left)),
        linear_to_db(peak(&left))
    );
    println!(
        "  Right:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&right)),
        linear_to_db(peak(&right))
    );

    tracing::info!(path = %args.output.display(), bit_depth = args.bit_depth, "writing output");
    write_wav_stereo(&args.output, &left, &right, sample_rate, args.bit_depth)?;
    println!("Wrote {} ({} samples)", args.output.display(), total);

    Ok(())
}
