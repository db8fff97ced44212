use crate::config::DetectorConfig;
use crate::detector::internals::{confidence_from_score, Correlogram, PeriodEstimate};
use crate::float::{from_f64, from_usize, Float};
use crate::utils::buffer::EdgeBuffer;
use crate::utils::peak::{local_peak, parabolic_offset, triangle_peak};

/// Half-width in lags of the neighbourhood searched around a submultiple or
/// multiple of the primary lag.
const SEARCH_RADIUS: usize = 2;

/// Largest distance in samples between an edge pair and a lag for the two
/// cycles to be compared.
const CYCLE_PAIR_TOLERANCE: f64 = 1.5;

/// Picks the period out of a correlogram.
///
/// The strongest lag in range is the primary candidate. Any periodic signal
/// also scores well at whole multiples of its period, so the global maximum
/// can land on a multiple. Submultiples of the primary are tried from the
/// shortest up, and the first whose peak is within `octave_margin` of the
/// primary wins. If none is, the longer lag stands. Peaks are compared after
/// triangle interpolation so that a period between two integer lags is not
/// penalized.
///
/// A dominant second harmonic makes half the period score as well as the
/// period itself, and the bitstream alone cannot tell them apart. The peaks of
/// the cycles can: when cycles one lag apart differ by more than
/// `cycle_mismatch` and cycles one multiple apart match, the multiple is the
/// period.
///
/// The chosen lag is refined with a parabola through its neighbours and then
/// with the spacing of the rising edges found by the conditioner.
#[derive(Debug, Clone)]
pub struct CandidateSelector<T>
where
    T: Float,
{
    octave_margin: T,
    max_submultiple: usize,
    confidence_floor: T,
    cycle_mismatch: T,
    edge_tolerance: T,
}

impl<T> CandidateSelector<T>
where
    T: Float,
{
    pub fn new(config: &DetectorConfig) -> Self {
        CandidateSelector {
            octave_margin: from_f64(config.octave_margin),
            max_submultiple: config.max_submultiple,
            confidence_floor: from_f64(config.confidence_floor),
            cycle_mismatch: from_f64(config.cycle_mismatch),
            edge_tolerance: from_f64(config.edge_tolerance),
        }
    }

    pub fn select(&self, correlogram: &Correlogram<T>, edges: &EdgeBuffer<T>) -> PeriodEstimate<T> {
        if correlogram.transitions() < 2 {
            return PeriodEstimate::undetermined();
        }

        let min_lag = correlogram.min_lag();
        let scores = correlogram.scores();
        let primary = match local_peak(scores, 1, scores.len() - 1) {
            Some(index) => index + min_lag - 1,
            None => return PeriodEstimate::undetermined(),
        };
        if confidence_from_score(correlogram.score(primary)) <= self.confidence_floor {
            return PeriodEstimate::undetermined();
        }

        let reference = self.peak_height(correlogram, primary) - self.octave_margin;
        let mut chosen = primary;
        for k in (2..=self.max_submultiple).rev() {
            let candidate = match peak_near(correlogram, primary / k) {
                Some(lag) => lag,
                None => continue,
            };
            if self.peak_height(correlogram, candidate) >= reference {
                chosen = candidate;
                break;
            }
        }
        let chosen = self.undouble(correlogram, chosen, edges);

        let offset = parabolic_offset(
            correlogram.score(chosen - 1),
            correlogram.score(chosen),
            correlogram.score(chosen + 1),
        );
        let estimate = PeriodEstimate {
            lag: from_usize::<T>(chosen) + offset,
            confidence: confidence_from_score(correlogram.score(chosen)),
        };
        PeriodEstimate {
            lag: self.refine(estimate.lag, edges),
            ..estimate
        }
    }

    /// Average period over every pair of edges spaced a whole number of
    /// periods apart, within `max(1, edge_tolerance * lag)` samples. Returns
    /// `lag` unchanged when no pair matches.
    pub fn refine(&self, lag: T, edges: &EdgeBuffer<T>) -> T {
        let tolerance = (self.edge_tolerance * lag).max(T::one());
        let mut total = T::zero();
        let mut periods = T::zero();
        for (i, first) in edges.iter().enumerate() {
            for later in edges.iter().skip(i + 1) {
                let distance = first.distance_to(later);
                let k = (distance / lag).round();
                if k < T::one() {
                    continue;
                }
                if (distance - k * lag).abs() <= tolerance {
                    total = total + distance;
                    periods = periods + k;
                }
            }
        }
        if periods > T::zero() {
            total / periods
        } else {
            lag
        }
    }

    /// The first multiple of `lag` in range that scores within `octave_margin`
    /// of it and whose cycles match where those one `lag` apart do not.
    fn undouble(&self, correlogram: &Correlogram<T>, lag: usize, edges: &EdgeBuffer<T>) -> usize {
        let mismatch = match cycle_mismatch(lag, edges) {
            Some(mismatch) if mismatch > self.cycle_mismatch => mismatch,
            _ => return lag,
        };
        let reference = self.peak_height(correlogram, lag) - self.octave_margin;
        let limit = correlogram.max_lag() + SEARCH_RADIUS;
        for target in (2..).map(|k| k * lag).take_while(|&target| target <= limit) {
            let candidate = match peak_near(correlogram, target) {
                Some(candidate) => candidate,
                None => continue,
            };
            if self.peak_height(correlogram, candidate) < reference {
                continue;
            }
            let matched = cycle_mismatch(candidate, edges)
                .map_or(false, |m| m < mismatch * from_f64::<T>(0.5));
            if matched {
                return candidate;
            }
        }
        lag
    }

    fn peak_height(&self, correlogram: &Correlogram<T>, lag: usize) -> T {
        triangle_peak(
            correlogram.score(lag - 1),
            correlogram.score(lag),
            correlogram.score(lag + 1),
        )
        .min(T::one())
    }
}

/// Strongest lag within `SEARCH_RADIUS` of `target`, clipped to the range.
fn peak_near<T: Float>(correlogram: &Correlogram<T>, target: usize) -> Option<usize> {
    let (min_lag, max_lag) = (correlogram.min_lag(), correlogram.max_lag());
    let start = target.saturating_sub(SEARCH_RADIUS).max(min_lag);
    let end = (target + SEARCH_RADIUS + 1).min(max_lag);
    if start > end {
        return None;
    }
    local_peak(correlogram.scores(), start + 1 - min_lag, end + 2 - min_lag)
        .map(|index| index + min_lag - 1)
}

/// Relative difference between the peaks of cycles whose edges lie `lag`
/// samples apart. `None` without such a pair.
fn cycle_mismatch<T: Float>(lag: usize, edges: &EdgeBuffer<T>) -> Option<T> {
    let lag = from_usize::<T>(lag);
    let tolerance = from_f64::<T>(CYCLE_PAIR_TOLERANCE);
    let mut difference = T::zero();
    let mut total = T::zero();
    for (i, first) in edges.iter().enumerate() {
        for later in edges.iter().skip(i + 1) {
            if (first.distance_to(later) - lag).abs() > tolerance {
                continue;
            }
            if let (Some(a), Some(b)) = (first.peak, later.peak) {
                difference = difference + (a - b).abs();
                total = total + (a + b) * from_f64::<T>(0.5);
            }
        }
    }
    if total > T::zero() {
        Some(difference / total)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::buffer::Edge;

    /// Correlogram of a triangle-shaped peak of `height` at every multiple of
    /// `period`, falling by `slope` per lag on a floor of 0.5.
    fn synthetic(period: f64, heights: &[f64], slope: f64) -> Correlogram<f64> {
        let mut correlogram = Correlogram::new(20, 400);
        for lag in correlogram.scored_lags() {
            let mut score: f64 = 0.5;
            for (m, height) in heights.iter().enumerate() {
                let distance = (lag as f64 - period * (m + 1) as f64).abs();
                score = score.max(height - slope * distance);
            }
            correlogram.set_score(lag, score);
        }
        correlogram.set_transitions(10);
        correlogram
    }

    fn selector() -> CandidateSelector<f64> {
        CandidateSelector::new(&DetectorConfig::default())
    }

    #[test]
    fn picks_the_fundamental_over_its_multiples() {
        let correlogram = synthetic(60.3, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0], 0.02);
        let estimate = selector().select(&correlogram, &EdgeBuffer::new(0));
        assert!((estimate.lag - 60.3).abs() < 0.5, "lag {}", estimate.lag);
        assert!(estimate.confidence > 0.9);
    }

    #[test]
    fn prefers_the_longer_lag_when_the_shorter_is_weaker() {
        // A strong second harmonic makes half the period look plausible, but
        // only the full period reaches the top score.
        let mut correlogram = synthetic(100.0, &[0.8, 1.0, 0.8, 1.0], 0.02);
        correlogram.set_score(200, 1.0);
        let estimate = selector().select(&correlogram, &EdgeBuffer::new(0));
        assert!((estimate.lag - 200.0).abs() < 0.5, "lag {}", estimate.lag);
    }

    /// Edges every `spacing` samples whose cycle peaks cycle through `peaks`.
    fn edges(spacing: f64, peaks: &[f64]) -> EdgeBuffer<f64> {
        let mut edges = EdgeBuffer::new(16);
        for n in 0..6 {
            let time = 5.0 + spacing * n as f64;
            edges.push(Edge {
                index: time.floor() as u64,
                fraction: time.fract(),
                peak: Some(peaks[n % peaks.len()]),
            });
        }
        edges
    }

    #[test]
    fn alternating_cycles_double_the_lag() {
        // Half the period scores as well as the period itself, as it does
        // under a dominant second harmonic.
        let correlogram = synthetic(100.0, &[1.0, 0.999, 1.0], 0.02);

        let estimate = selector().select(&correlogram, &edges(100.0, &[0.97, 0.83]));
        assert!((estimate.lag - 200.0).abs() < 1e-9, "lag {}", estimate.lag);

        // Identical cycles keep the shorter lag.
        let estimate = selector().select(&correlogram, &edges(100.0, &[0.9]));
        assert!((estimate.lag - 100.0).abs() < 1e-9, "lag {}", estimate.lag);
        let estimate = selector().select(&correlogram, &EdgeBuffer::new(0));
        assert!((estimate.lag - 100.0).abs() < 0.5, "lag {}", estimate.lag);
    }

    #[test]
    fn doubling_needs_a_comparable_score() {
        let correlogram = synthetic(100.0, &[1.0, 0.9], 0.02);
        let estimate = selector().select(&correlogram, &edges(100.0, &[0.97, 0.83]));
        assert!((estimate.lag - 100.0).abs() < 1e-9, "lag {}", estimate.lag);
    }

    #[test]
    fn cycle_mismatch_compares_cycles_one_lag_apart() {
        let alternating = edges(100.0, &[0.9, 0.6]);
        let mismatch = cycle_mismatch(100, &alternating).unwrap();
        assert!((mismatch - 0.4).abs() < 1e-12, "mismatch {}", mismatch);
        assert_eq!(cycle_mismatch(200, &alternating), Some(0.0));
        assert_eq!(cycle_mismatch(150, &alternating), None);
    }

    #[test]
    fn degenerate_windows_are_undetermined() {
        let mut flat = synthetic(50.0, &[1.0], 0.02);
        flat.set_transitions(1);
        assert_eq!(
            selector().select(&flat, &EdgeBuffer::new(0)),
            PeriodEstimate::undetermined()
        );

        // Nothing better than chance.
        let noise = synthetic(50.0, &[0.5], 0.02);
        assert!(!selector()
            .select(&noise, &EdgeBuffer::new(0))
            .is_determined());
    }

    #[test]
    fn edges_refine_the_lag() {
        let mut edges = EdgeBuffer::new(16);
        let period = 60.37;
        for n in 0..8 {
            let time = 5.0 + period * n as f64;
            edges.push(Edge {
                index: time.floor() as u64,
                fraction: time.fract(),
                peak: None,
            });
        }
        let refined = selector().refine(60.2, &edges);
        assert!((refined - period).abs() < 1e-9, "refined {}", refined);

        // No pair near a multiple of the lag.
        assert_eq!(selector().refine(35.0, &edges), 35.0);
    }
}
