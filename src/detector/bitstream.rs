use std::ops::RangeInclusive;

use crate::config::DetectorConfig;
use crate::detector::conditioner::SignalConditioner;
use crate::detector::correlator::BitstreamCorrelator;
use crate::detector::internals::{Correlogram, PeriodEstimate, Pitch, WindowGeometry};
use crate::detector::selector::CandidateSelector;
use crate::detector::tracker::{StabilityTracker, TrackerMode};
use crate::detector::PitchTracker;
use crate::error::PitchResult;
use crate::float::Float;
use crate::units::{Decibel, Frequency};
use crate::utils::buffer::EdgeBuffer;

/// Streaming pitch tracker built on bitstream autocorrelation.
///
/// Feed it one sample at a time with [PitchTracker::process]. Every buffer is
/// allocated in the constructor, so processing never allocates.
///
/// ```rust
/// use pitch_tracker::detector::bitstream::BitstreamDetector;
/// use pitch_tracker::detector::PitchTracker;
/// use pitch_tracker::units::{Decibel, Frequency};
///
/// let mut detector = BitstreamDetector::<f32>::new(
///     Frequency::hz(100.0),
///     Frequency::hz(1000.0),
///     44100,
///     Decibel::db(-45.0),
/// )
/// .unwrap();
///
/// // Half a second of silence never produces a pitch.
/// for _ in 0..22050 {
///     assert!(!detector.process(0.0));
/// }
/// assert_eq!(detector.frequency(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct BitstreamDetector<T>
where
    T: Float,
{
    geometry: WindowGeometry,
    sample_rate: usize,
    conditioner: SignalConditioner<T>,
    correlator: BitstreamCorrelator<T>,
    selector: CandidateSelector<T>,
    edges: EdgeBuffer<T>,
    tracker: StabilityTracker<T>,
    estimate: PeriodEstimate<T>,
}

impl<T> BitstreamDetector<T>
where
    T: Float,
{
    /// Detector for pitches between `lowest` and `highest` with the default
    /// [DetectorConfig]. Signal under `gate` (relative to full scale) counts
    /// as silence.
    pub fn new(
        lowest: Frequency,
        highest: Frequency,
        sample_rate: usize,
        gate: Decibel,
    ) -> PitchResult<Self> {
        Self::with_config(lowest, highest, sample_rate, gate, DetectorConfig::default())
    }

    pub fn with_config(
        lowest: Frequency,
        highest: Frequency,
        sample_rate: usize,
        gate: Decibel,
        config: DetectorConfig,
    ) -> PitchResult<Self> {
        config.validate()?;
        let geometry = WindowGeometry::new(lowest, highest, sample_rate)?;

        log::debug!(
            "bitstream detector: {} to {} at {} Hz, window {} bits, lags {}..={}, span {}",
            lowest,
            highest,
            sample_rate,
            geometry.capacity,
            geometry.min_lag,
            geometry.max_lag,
            geometry.span
        );

        Ok(BitstreamDetector {
            geometry,
            sample_rate,
            conditioner: SignalConditioner::new(gate, sample_rate, &config),
            correlator: BitstreamCorrelator::new(&geometry, &config),
            selector: CandidateSelector::new(&config),
            edges: EdgeBuffer::new(geometry.edge_capacity()),
            tracker: StabilityTracker::new(sample_rate, &config),
            estimate: PeriodEstimate::undetermined(),
        })
    }

    /// The committed pitch and its clarity, when there is one.
    pub fn pitch(&self) -> Option<Pitch<T>> {
        let frequency = self.tracker.frequency();
        if frequency > T::zero() {
            Some(Pitch {
                frequency,
                clarity: self.tracker.clarity(),
            })
        } else {
            None
        }
    }

    pub fn mode(&self) -> TrackerMode {
        self.tracker.mode()
    }

    /// Estimate from the most recent scan, committed or not.
    pub fn estimate(&self) -> PeriodEstimate<T> {
        self.estimate
    }

    /// Scores of the most recent scan.
    pub fn correlogram(&self) -> &Correlogram<T> {
        self.correlator.correlogram()
    }

    /// Length of the bit window in samples.
    pub fn window_size(&self) -> usize {
        self.geometry.capacity
    }

    /// Candidate lags in samples.
    pub fn lag_range(&self) -> RangeInclusive<usize> {
        self.geometry.lag_range()
    }

    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }
}

impl<T> PitchTracker<T> for BitstreamDetector<T>
where
    T: Float,
{
    fn process(&mut self, sample: T) -> bool {
        let bit = match self.conditioner.encode(sample) {
            Some(bit) => bit,
            None => {
                self.correlator.clear();
                self.edges.clear();
                return self.tracker.update(false, None);
            }
        };

        if let Some(edge) = self.conditioner.confirmed_edge() {
            self.edges.push(edge);
        }
        // Keep edges that fall inside the bit window.
        let newest = self.conditioner.samples() - 1;
        self.edges
            .prune_before(newest.saturating_sub(self.geometry.capacity as u64));

        let estimate = match self.correlator.accumulate(bit) {
            Some(correlogram) => {
                let estimate = self.selector.select(correlogram, &self.edges);
                log::trace!(
                    "scan: lag {} confidence {} from {} edges",
                    estimate.lag,
                    estimate.confidence,
                    self.edges.len()
                );
                self.estimate = estimate;
                Some(estimate)
            }
            None => None,
        };
        self.tracker.update(true, estimate)
    }

    fn frequency(&self) -> T {
        self.tracker.frequency()
    }

    fn reset(&mut self) {
        self.conditioner.reset();
        self.correlator.clear();
        self.edges.clear();
        self.tracker.reset();
        self.estimate = PeriodEstimate::undetermined();
    }
}
