use std::ops::RangeInclusive;

use crate::error::{PitchError, PitchResult};
use crate::float::{from_f64, from_usize, Float};
use crate::units::Frequency;

/// A committed frequency in Hz and its clarity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    pub frequency: T,
    pub clarity: T,
}

/// Buffer sizes derived once from the frequency range and sample rate.
///
/// The window holds two periods of the lowest frequency. Lags run from the
/// shortest period in range (rounded down) to the longest (rounded up), and
/// every lag is compared over the same `span` of bits so scores are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub capacity: usize,
    pub min_lag: usize,
    pub max_lag: usize,
    pub span: usize,
    pub hop: usize,
}

impl WindowGeometry {
    pub fn new(lowest: Frequency, highest: Frequency, sample_rate: usize) -> PitchResult<Self> {
        let (lo, hi) = (lowest.as_hz(), highest.as_hz());
        let invalid = |reason: &'static str| PitchError::InvalidRange {
            lowest: lo,
            highest: hi,
            sample_rate,
            reason,
        };

        if sample_rate == 0 {
            return Err(invalid("sample rate must be positive"));
        }
        if !lowest.is_pitch() || !highest.is_pitch() {
            return Err(invalid("frequencies must be finite and positive"));
        }
        if hi <= lo {
            return Err(invalid("highest frequency must exceed lowest frequency"));
        }

        let rate = sample_rate as f64;
        let min_lag = (rate / hi).floor() as usize;
        let max_lag = (rate / lo).ceil() as usize;
        let capacity = (2.0 * rate / lo).ceil() as usize;

        if min_lag < 2 {
            return Err(invalid(
                "highest frequency leaves fewer than two samples per period",
            ));
        }
        if capacity < max_lag + 2 {
            return Err(invalid("lag range does not fit the window"));
        }

        Ok(WindowGeometry {
            capacity,
            min_lag,
            max_lag,
            span: capacity - max_lag - 1,
            hop: max_lag,
        })
    }

    pub fn lag_range(&self) -> RangeInclusive<usize> {
        self.min_lag..=self.max_lag
    }

    /// Upper bound on rising edges that fit in the window: each one needs the
    /// bit to be low and then high.
    pub fn edge_capacity(&self) -> usize {
        self.capacity / 2 + 1
    }
}

/// Similarity scores for every candidate lag of one scan.
///
/// One guard lag on each side of the range is kept so that peaks at the
/// range edges can still be interpolated.
#[derive(Debug, Clone)]
pub struct Correlogram<T>
where
    T: Float,
{
    scores: Vec<T>,
    min_lag: usize,
    max_lag: usize,
    transitions: usize,
}

impl<T> Correlogram<T>
where
    T: Float,
{
    pub fn new(min_lag: usize, max_lag: usize) -> Self {
        assert!(min_lag >= 1 && min_lag <= max_lag);
        Correlogram {
            scores: vec![T::zero(); max_lag - min_lag + 3],
            min_lag,
            max_lag,
            transitions: 0,
        }
    }

    pub fn min_lag(&self) -> usize {
        self.min_lag
    }

    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Every lag that has a score, guard lags included.
    pub fn scored_lags(&self) -> RangeInclusive<usize> {
        self.min_lag - 1..=self.max_lag + 1
    }

    /// Score at `lag`, which must lie in [Correlogram::scored_lags].
    pub fn score(&self, lag: usize) -> T {
        self.scores[lag + 1 - self.min_lag]
    }

    pub fn set_score(&mut self, lag: usize, score: T) {
        self.scores[lag + 1 - self.min_lag] = score;
    }

    /// Scores of [Correlogram::scored_lags] in order.
    pub fn scores(&self) -> &[T] {
        &self.scores
    }

    /// Number of bit changes inside the compared span.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    pub fn set_transitions(&mut self, transitions: usize) {
        self.transitions = transitions;
    }
}

/// Period length in samples and how much it is trusted, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodEstimate<T> {
    pub lag: T,
    pub confidence: T,
}

impl<T: Float> PeriodEstimate<T> {
    pub fn undetermined() -> Self {
        PeriodEstimate {
            lag: T::zero(),
            confidence: T::zero(),
        }
    }

    pub fn is_determined(&self) -> bool {
        self.lag > T::zero() && self.confidence > T::zero()
    }
}

/// Frequency of a period `lag` samples long, or `0` for a non-positive lag.
pub fn to_frequency<T: Float>(lag: T, sample_rate: usize) -> T {
    if lag > T::zero() {
        from_usize::<T>(sample_rate) / lag
    } else {
        T::zero()
    }
}

/// Map a normalized agreement score so that chance agreement (one half) is zero.
pub fn confidence_from_score<T: Float>(score: T) -> T {
    (from_f64::<T>(2.0) * score - T::one())
        .max(T::zero())
        .min(T::one())
}
