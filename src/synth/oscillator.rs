//! Phase-accumulator oscillators.
//!
//! A [Phase] covers one cycle with the whole `u32` range, so accumulating it
//! wraps for free and never drifts. Waveforms are evaluated at a phase and
//! produce output in `[-1, 1]`.

use std::f64::consts::PI;
use std::ops::{Add, AddAssign};

use crate::units::Frequency;

const CYCLE: f64 = 4_294_967_296.0;

/// Position within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Phase(pub u32);

impl Phase {
    pub const ZERO: Phase = Phase(0);

    /// Per-sample increment that plays `frequency` at `sample_rate`.
    pub fn from_frequency(frequency: Frequency, sample_rate: usize) -> Phase {
        Self::from_fraction(frequency.as_hz() / sample_rate as f64)
    }

    /// Phase at `fraction` of a cycle. Whole cycles are dropped.
    pub fn from_fraction(fraction: f64) -> Phase {
        Phase((fraction.rem_euclid(1.0) * CYCLE) as u64 as u32)
    }

    /// Position in `[0, 1)`.
    pub fn fraction(self) -> f64 {
        self.0 as f64 / CYCLE
    }
}

impl Add for Phase {
    type Output = Phase;

    fn add(self, rhs: Phase) -> Phase {
        Phase(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, rhs: Phase) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

pub fn sine(phase: Phase) -> f64 {
    (2.0 * PI * phase.fraction()).sin()
}

pub fn saw(phase: Phase) -> f64 {
    2.0 * phase.fraction() - 1.0
}

/// Band-limited pulse with a settable duty cycle.
///
/// Both steps are smoothed with a polynomial band-limited step, which needs
/// the phase increment to know how wide one sample is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    width: f64,
}

impl Pulse {
    /// Pulse that is high for `width` of each cycle, clamped to `[0, 1]`.
    pub fn new(width: f64) -> Self {
        Pulse {
            width: width.max(0.0).min(1.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width.max(0.0).min(1.0);
    }

    pub fn sample(&self, phase: Phase, increment: Phase) -> f64 {
        let t = phase.fraction();
        let dt = increment.fraction();
        let naive = if t < self.width { 1.0 } else { -1.0 };
        let falling = (t - self.width).rem_euclid(1.0);
        naive + poly_blep(t, dt) - poly_blep(falling, dt)
    }
}

impl Default for Pulse {
    fn default() -> Self {
        Pulse::new(0.5)
    }
}

/// Correction for a unit step at phase 0, spread over one sample either side.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let x = t / dt;
        x + x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + x + x + 1.0
    } else {
        0.0
    }
}
