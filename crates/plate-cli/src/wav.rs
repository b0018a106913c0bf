//! WAV file reading and writing.

use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Errors from WAV I/O.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Hound(#[from] hound::Error),

    /// Output bit depth other than 16, 24 or 32.
    #[error("unsupported bit depth: {0} (expected 16, 24, or 32)")]
    UnsupportedBitDepth(u16),

    /// Left and right buffers of different lengths.
    #[error("channel length mismatch: left {left}, right {right}")]
    ChannelMismatch {
        /// Left channel length.
        left: usize,
        /// Right channel length.
        right: usize,
    },
}

/// Result alias for WAV I/O.
pub type Result<T> = std::result::Result<T, WavError>;

/// Format details of a file that was read.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of channels in the file (before downmix).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

/// Check that `bits` is a depth [`write_wav_stereo`] can produce.
pub fn check_bit_depth(bits: u16) -> Result<()> {
    match bits {
        16 | 24 | 32 => Ok(()),
        other => Err(WavError::UnsupportedBitDepth(other)),
    }
}

/// Magnitude of the most negative integer sample at `bits` (`2^(bits-1)`).
fn full_scale(bits: u16) -> f64 {
    2f64.powi(i32::from(bits) - 1)
}

/// Read a WAV file as mono `f64` samples in `[-1, 1]`.
///
/// Multi-channel files are mixed down by averaging channels.
pub fn read_wav_mono<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f64> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f64>() / channels as f64)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec))
}

/// Write interleaved stereo. 32-bit output is IEEE float, 16/24-bit is PCM.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    left: &[f64],
    right: &[f64],
    sample_rate: u32,
    bits_per_sample: u16,
) -> Result<()> {
    check_bit_depth(bits_per_sample)?;
    if left.len() != right.len() {
        return Err(WavError::ChannelMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, spec)?;

    if bits_per_sample == 32 {
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample(l as f32)?;
            writer.write_sample(r as f32)?;
        }
    } else {
        let max_val = full_scale(bits_per_sample);
        let quantize = |x: f64| (x * max_val).clamp(-max_val, max_val - 1.0) as i32;
        for (&l, &r) in left.iter().zip(right) {
            writer.write_sample(quantize(l))?;
            writer.write_sample(quantize(r))?;
        }
    }

    writer.finalize()?;
    Ok(())
}
