//! Impulse demo: onset, decay per half second, and the modulation sweep.
//!
//! Run with: cargo run -p plate-core --example impulse_demo

use plate_core::{DattorroReverb, REFERENCE_SAMPLE_RATE, ReverbParam};

fn main() {
    let mut reverb = DattorroReverb::new().expect("allocate reverb");

    println!("=== Parameters ===\n");
    for param in ReverbParam::ALL {
        println!("{:<20} {:>6.3}", param.label(), param.get(&reverb.params()));
    }
    println!("{:<20} {:>6.3}", "Decay diffusion 2", reverb.decay_diffusion_2());
    println!(
        "\nPre-delay: {} samples, {} samples allocated",
        reverb.pre_delay_samples(),
        reverb.allocated_samples()
    );

    let sr = REFERENCE_SAMPLE_RATE as usize;
    let mut onset = None;
    let mut block_energy = vec![0.0; 6];

    for n in 0..3 * sr {
        let (l, r) = reverb.process_stereo(if n == 0 { 1.0 } else { 0.0 });
        if onset.is_none() && (l != 0.0 || r != 0.0) {
            onset = Some(n);
        }
        block_energy[n / (sr / 2)] += l * l + r * r;
    }

    println!("\n=== Impulse response ===\n");
    if let Some(n) = onset {
        println!("First output at sample {n} ({:.2} ms)", n as f64 * 1000.0 / REFERENCE_SAMPLE_RATE);
    }
    for (k, e) in block_energy.iter().enumerate() {
        let db = 10.0 * e.max(1e-30).log10();
        println!("{:>4.1}s - {:>4.1}s  {:>8.1} dB", k as f64 * 0.5, (k + 1) as f64 * 0.5, db);
    }

    println!("\n=== Modulated diffusers ===\n");
    reverb.reset();
    for step in 0..8 {
        for _ in 0..8192 {
            reverb.process(0.0);
        }
        let [a, b] = reverb.modulated_delays();
        println!("after {:>6} samples: A {a}, B {b}", (step + 1) * 8192);
    }
}
