//! # Pitch Tracker
//! *pitch_tracker* follows the fundamental frequency of a monophonic signal in
//! real time, one sample at a time. It is designed for audio callbacks: all
//! memory is allocated when a detector is built, and processing a sample never
//! blocks or allocates.
//!
//! # Detector
//! [BitstreamDetector][detector::bitstream::BitstreamDetector] turns the signal
//! into a one-bit stream with an envelope-tracking hysteresis comparator, runs
//! a bitwise autocorrelation over a window two periods of the lowest frequency
//! long, and refines the winning lag with the exact timing of zero crossings.
//! A small state machine holds a committed frequency steady and bridges short
//! dropouts.
//!
//! Tuning lives in [DetectorConfig][config::DetectorConfig]; the defaults suit
//! the guitar range and most monophonic instruments.
//!
//! # Examples
//! ```
//! use pitch_tracker::detector::bitstream::BitstreamDetector;
//! use pitch_tracker::detector::PitchTracker;
//! use pitch_tracker::units::{Decibel, Frequency};
//!
//! fn main() {
//!     const SAMPLE_RATE: usize = 44100;
//!
//!     let mut detector = BitstreamDetector::<f64>::new(
//!         Frequency::hz(80.0),
//!         Frequency::hz(400.0),
//!         SAMPLE_RATE,
//!         Decibel::db(-45.0),
//!     )
//!     .unwrap();
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 196.0;
//!     for n in 0..SAMPLE_RATE / 4 {
//!         let sample = 0.5 * (2.0 * std::f64::consts::PI * n as f64 * dt * freq).sin();
//!         if detector.process(sample) {
//!             println!("Frequency: {}", detector.frequency());
//!         }
//!     }
//!     assert!((detector.frequency() - freq).abs() < 0.01);
//! }
//! ```

pub use config::DetectorConfig;
pub use detector::bitstream::BitstreamDetector;
pub use detector::internals::Pitch;
pub use detector::PitchTracker;
pub use error::{PitchError, PitchResult};

pub mod config;
pub mod detector;
pub mod error;
pub mod float;
pub mod notes;
pub mod synth;
pub mod units;
pub mod utils;
