//! Tuning parameters for the bitstream detector.

use crate::error::{PitchError, PitchResult};
use crate::units::Duration;

/// Detector configuration parameters.
///
/// The defaults are calibrated against sums of harmonics across the guitar
/// range; most callers only choose the frequency range and gate threshold
/// passed to the detector constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    // Signal conditioner
    /// Hysteresis band as a fraction of the tracked envelope (default: 0.1)
    pub hysteresis: f64,

    /// Release time constant of the peak envelope follower (default: 30 ms)
    pub envelope_release: Duration,

    // Autocorrelator
    /// Weight of the disagreement-run penalty (default: 1.0)
    pub cancellation_weight: f64,

    /// Disagreement runs up to this length cost nothing extra (default: 1)
    /// A run of one bit is what a fractional lag mismatch produces at an edge.
    pub cancellation_run_floor: usize,

    // Candidate selector
    /// How far below the primary peak a submultiple may score and still be
    /// preferred (default: 0.005, on the normalized score scale)
    pub octave_margin: f64,

    /// Largest submultiple of the primary lag that is considered (default: 6)
    pub max_submultiple: usize,

    /// Confidence at or below which the selector reports nothing (default: 0.0)
    pub confidence_floor: f64,

    /// Relative difference between the peaks of cycles one lag apart above
    /// which a multiple of the lag is tried as the period (default: 0.05)
    pub cycle_mismatch: f64,

    /// Relative tolerance for matching edge pairs to the coarse lag (default: 0.05)
    /// Never tighter than one sample.
    pub edge_tolerance: f64,

    // Stability tracker
    /// Confidence required for an estimate to count towards lock (default: 0.5)
    pub lock_confidence: f64,

    /// Consecutive agreeing scans needed to lock (default: 2)
    pub lock_scans: usize,

    /// Relative lag difference under which two estimates agree (default: 0.02)
    pub stability_tolerance: f64,

    /// How long a locked value is held after the gate closes (default: 50 ms)
    pub release_grace: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            hysteresis: 0.1,
            envelope_release: Duration::ms(30.0),
            cancellation_weight: 1.0,
            cancellation_run_floor: 1,
            octave_margin: 0.005,
            max_submultiple: 6,
            confidence_floor: 0.0,
            cycle_mismatch: 0.05,
            edge_tolerance: 0.05,
            lock_confidence: 0.5,
            lock_scans: 2,
            stability_tolerance: 0.02,
            release_grace: Duration::ms(50.0),
        }
    }
}

impl DetectorConfig {
    /// Check every field against its domain.
    pub fn validate(&self) -> PitchResult<()> {
        unit_interval("hysteresis", self.hysteresis, false)?;
        non_negative("cancellation_weight", self.cancellation_weight)?;
        non_negative("octave_margin", self.octave_margin)?;
        non_negative("cycle_mismatch", self.cycle_mismatch)?;
        unit_interval("confidence_floor", self.confidence_floor, false)?;
        unit_interval("lock_confidence", self.lock_confidence, true)?;
        unit_interval("stability_tolerance", self.stability_tolerance, false)?;
        unit_interval("edge_tolerance", self.edge_tolerance, false)?;

        let release = self.envelope_release.as_seconds();
        if release <= 0.0 || release.is_nan() {
            return Err(PitchError::invalid_param(
                "envelope_release",
                format!("must be positive, got {}", self.envelope_release),
            ));
        }
        non_negative("release_grace", self.release_grace.as_seconds())?;
        if self.lock_scans == 0 {
            return Err(PitchError::invalid_param("lock_scans", "must be at least 1"));
        }
        if self.max_submultiple < 1 {
            return Err(PitchError::invalid_param(
                "max_submultiple",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> PitchResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PitchError::invalid_param(
            name,
            format!("must be a finite, non-negative number, got {}", value),
        ))
    }
}

fn unit_interval(name: &'static str, value: f64, closed: bool) -> PitchResult<()> {
    let upper_ok = if closed { value <= 1.0 } else { value < 1.0 };
    if value >= 0.0 && upper_ok {
        Ok(())
    } else {
        let interval = if closed { "[0, 1]" } else { "[0, 1)" };
        Err(PitchError::invalid_param(
            name,
            format!("must lie in {}, got {}", interval, value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(DetectorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_domain_fields() {
        let config = DetectorConfig {
            hysteresis: 1.0,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PitchError::InvalidParameter {
                name: "hysteresis",
                ..
            })
        ));

        let config = DetectorConfig {
            lock_scans: 0,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectorConfig {
            cancellation_weight: f64::NAN,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectorConfig {
            envelope_release: Duration::seconds(0.0),
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
