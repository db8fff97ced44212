//! Strongly typed frequency, duration and level values.
//!
//! Each quantity is its own type so a duration can never be passed where a
//! frequency is expected. Conversions to raw numbers are explicit.

use std::fmt;
use std::ops::{Div, Mul};

/// A frequency in Hz. `0.0` is the "no pitch" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Frequency(f64);

impl Frequency {
    /// The "no pitch" sentinel.
    pub const ZERO: Frequency = Frequency(0.0);

    pub const fn hz(value: f64) -> Self {
        Frequency(value)
    }

    pub fn as_hz(self) -> f64 {
        self.0
    }

    /// Period length in samples at `sample_rate`, or `0.0` for the sentinel.
    pub fn period(self, sample_rate: usize) -> f64 {
        if self.is_pitch() {
            sample_rate as f64 / self.0
        } else {
            0.0
        }
    }

    /// Frequency whose period is `samples` long at `sample_rate`. A non-positive
    /// period maps to the sentinel.
    pub fn from_period(samples: f64, sample_rate: usize) -> Self {
        if samples > 0.0 && samples.is_finite() {
            Frequency(sample_rate as f64 / samples)
        } else {
            Frequency::ZERO
        }
    }

    /// `true` for a finite, positive frequency.
    pub fn is_pitch(self) -> bool {
        self.0 > 0.0 && self.0.is_finite()
    }

    /// Signed distance to `reference` in cents (1200 per octave).
    pub fn cents_from(self, reference: Frequency) -> f64 {
        1200.0 * (self.0 / reference.0).log2()
    }

    /// Shift by a number of equal-tempered semitones.
    pub fn transpose(self, semitones: f64) -> Self {
        Frequency(self.0 * (semitones / 12.0).exp2())
    }
}

impl Mul<f64> for Frequency {
    type Output = Frequency;

    fn mul(self, rhs: f64) -> Frequency {
        Frequency(self.0 * rhs)
    }
}

impl Div<f64> for Frequency {
    type Output = Frequency;

    fn div(self, rhs: f64) -> Frequency {
        Frequency(self.0 / rhs)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// A time span in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Duration(f64);

impl Duration {
    pub const fn seconds(value: f64) -> Self {
        Duration(value)
    }

    pub fn ms(value: f64) -> Self {
        Duration(value / 1000.0)
    }

    pub fn as_seconds(self) -> f64 {
        self.0
    }

    /// Length in whole samples at `sample_rate`, rounded to nearest.
    pub fn samples(self, sample_rate: usize) -> usize {
        (self.0 * sample_rate as f64).round().max(0.0) as usize
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.0)
    }
}

/// A level in decibels relative to full scale (or to a peak, by context).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Decibel(f64);

impl Decibel {
    pub const fn db(value: f64) -> Self {
        Decibel(value)
    }

    pub fn as_db(self) -> f64 {
        self.0
    }

    /// Linear amplitude ratio, `10^(dB/20)`.
    pub fn to_gain(self) -> f64 {
        10f64.powf(self.0 / 20.0)
    }

    /// Level of a linear amplitude. Zero maps to negative infinity.
    pub fn from_gain(gain: f64) -> Self {
        Decibel(20.0 * gain.abs().log10())
    }
}

impl fmt::Display for Decibel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dB", self.0)
    }
}
