//! Synthesize ten seconds of an enveloped pulse wave, write it to a 16-bit
//! `.wav` file and track its pitch.
//!
//! ```text
//! cargo run --example gen_pulse -- [output.wav]
//! ```

use std::env;
use std::error::Error;

use pitch_tracker::detector::bitstream::BitstreamDetector;
use pitch_tracker::detector::PitchTracker;
use pitch_tracker::notes::MIDDLE_A;
use pitch_tracker::synth::envelope::{Envelope, EnvelopeConfig};
use pitch_tracker::synth::oscillator::{Phase, Pulse};
use pitch_tracker::units::{Decibel, Frequency};

const SAMPLE_RATE: usize = 48000;
const LENGTH: usize = SAMPLE_RATE * 10;

fn synthesize() -> Vec<f64> {
    let mut envelope = Envelope::new(&EnvelopeConfig::default(), SAMPLE_RATE);
    let increment = Phase::from_frequency(MIDDLE_A, SAMPLE_RATE);
    let mut phase = Phase::ZERO;
    let mut pulse = Pulse::default();

    envelope.trigger();
    (0..LENGTH)
        .map(|i| {
            if i == LENGTH / 2 {
                envelope.release();
            }
            let level = envelope.next();
            pulse.set_width(level * 0.6 + 0.3);
            let sample = pulse.sample(phase, increment) * level;
            phase += increment;
            sample
        })
        .collect()
}

fn write_wav(path: &str, signal: &[f64]) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in signal {
        let clipped = sample.max(-1.0).min(1.0);
        writer.write_sample((clipped * i16::MAX as f64).round() as i16)?;
    }
    writer.finalize()
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("gen_pulse.wav"));

    let signal = synthesize();
    write_wav(&path, &signal)?;
    println!("Wrote {} samples to {}", signal.len(), path);

    let mut detector = BitstreamDetector::<f64>::new(
        Frequency::hz(200.0),
        Frequency::hz(1000.0),
        SAMPLE_RATE,
        Decibel::db(-45.0),
    )?;

    let mut mode = detector.mode();
    let (mut frames, mut total, mut worst) = (0usize, 0.0f64, 0.0f64);
    for (i, &sample) in signal.iter().enumerate() {
        if detector.process(sample) {
            let error = Frequency::hz(detector.frequency()).cents_from(MIDDLE_A).abs();
            frames += 1;
            total += error;
            worst = worst.max(error);
        }
        if detector.mode() != mode {
            mode = detector.mode();
            println!(
                "{:>8.3} s  {:?}",
                i as f64 / SAMPLE_RATE as f64,
                mode
            );
        }
    }

    if frames > 0 {
        println!(
            "{} estimates, average error {:.6} cents, max {:.6} cents",
            frames,
            total / frames as f64,
            worst
        );
    } else {
        println!("No pitch detected");
    }
    Ok(())
}
