use crate::config::DetectorConfig;
use crate::detector::internals::{Correlogram, WindowGeometry};
use crate::float::{from_f64, from_usize, Float};
use crate::utils::buffer::{low_mask, word_at, word_count, BitWindow};

/// Bitstream autocorrelation with a penalty for runs of disagreement.
///
/// Bits are pushed one at a time. Once the window is full, every `hop` bits the
/// window is compared with itself at every candidate lag. The score of a lag
/// is the fraction of agreeing bits over a fixed span, minus
/// `weight * sum(max(0, run - run_floor))` over runs of disagreeing bits.
/// Lag quantization costs isolated single bits at each edge, while a harmonic
/// that only lines up every other cycle leaves long runs, so only the latter is
/// penalized.
#[derive(Debug, Clone)]
pub struct BitstreamCorrelator<T>
where
    T: Float,
{
    window: BitWindow,
    linear: Vec<u64>,
    correlogram: Correlogram<T>,
    span: usize,
    hop: usize,
    since_scan: usize,
    weight: T,
    run_floor: u32,
}

impl<T> BitstreamCorrelator<T>
where
    T: Float,
{
    pub fn new(geometry: &WindowGeometry, config: &DetectorConfig) -> Self {
        BitstreamCorrelator {
            window: BitWindow::new(geometry.capacity),
            linear: vec![0; word_count(geometry.capacity) + 1],
            correlogram: Correlogram::new(geometry.min_lag, geometry.max_lag),
            span: geometry.span,
            hop: geometry.hop,
            since_scan: 0,
            weight: from_f64(config.cancellation_weight),
            run_floor: config.cancellation_run_floor.min(u32::MAX as usize) as u32,
        }
    }

    /// Push one bit. Returns the fresh correlogram when this bit completed a scan.
    pub fn accumulate(&mut self, bit: bool) -> Option<&Correlogram<T>> {
        self.window.push(bit);
        self.since_scan += 1;
        if !self.window.is_full() || self.since_scan < self.hop {
            return None;
        }
        self.since_scan = 0;
        self.scan();
        Some(&self.correlogram)
    }

    /// Forget every bit. The next scan waits for a full window.
    pub fn clear(&mut self) {
        self.window.clear();
        self.since_scan = 0;
    }

    /// Result of the most recent scan.
    pub fn correlogram(&self) -> &Correlogram<T> {
        &self.correlogram
    }

    pub fn window(&self) -> &BitWindow {
        &self.window
    }

    fn scan(&mut self) {
        self.window.linearize(&mut self.linear);
        let words = word_count(self.span);

        let mut transitions = 0;
        for w in 0..words {
            let offset = 64 * w;
            // Pairs (i, i + 1) with i + 1 < span.
            let valid = (self.span - 1).saturating_sub(offset).min(64);
            let changes = (self.linear[w] ^ word_at(&self.linear, offset + 1)) & low_mask(valid);
            transitions += changes.count_ones() as usize;
        }
        self.correlogram.set_transitions(transitions);

        let span = from_usize::<T>(self.span);
        for lag in self.correlogram.scored_lags() {
            let mut agreements = 0;
            let mut penalty = 0;
            let mut run = 0;
            for w in 0..words {
                let offset = 64 * w;
                let valid = (self.span - offset).min(64) as u32;
                let diff =
                    (self.linear[w] ^ word_at(&self.linear, offset + lag)) & low_mask(valid as usize);
                agreements += valid - diff.count_ones();
                penalty += disagreement_penalty(diff, valid, &mut run, self.run_floor);
            }
            penalty += run.saturating_sub(self.run_floor);

            let score = (from_usize::<T>(agreements as usize)
                - self.weight * from_usize::<T>(penalty as usize))
                / span;
            self.correlogram.set_score(lag, score);
        }
    }
}

/// Walk the low `valid` bits of `diff` from bit 0 upwards, extending `run` over
/// set bits and closing it at each clear bit. Returns the penalty of the runs
/// closed inside this word; an open run carries over to the next word.
fn disagreement_penalty(diff: u64, valid: u32, run: &mut u32, floor: u32) -> u32 {
    let mut bits = diff;
    let mut left = valid;
    let mut penalty = 0;
    while left > 0 {
        let ones = bits.trailing_ones().min(left);
        *run += ones;
        bits = bits.checked_shr(ones).unwrap_or(0);
        left -= ones;
        if left == 0 {
            break;
        }

        let zeros = bits.trailing_zeros().min(left);
        penalty += run.saturating_sub(floor);
        *run = 0;
        bits = bits.checked_shr(zeros).unwrap_or(0);
        left -= zeros;
    }
    penalty
}
