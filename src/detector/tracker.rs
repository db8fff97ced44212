use std::cmp::Ordering;

use crate::config::DetectorConfig;
use crate::detector::internals::{to_frequency, PeriodEstimate};
use crate::float::{from_f64, Float};

/// Number of agreeing lags the committed value is the median of.
const MEDIAN_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerMode {
    /// No signal, or the signal went away.
    Idle,
    /// Signal present, waiting for estimates to settle.
    Acquiring,
    /// A stable frequency is available.
    Locked,
    /// Signal gone; the last frequency is held for a short grace period.
    Releasing,
}

/// Smooths period estimates across scans and decides when a value is committed.
#[derive(Debug, Clone)]
pub struct StabilityTracker<T>
where
    T: Float,
{
    mode: TrackerMode,
    gate_open: bool,
    frequency: T,
    clarity: T,
    previous_lag: Option<T>,
    stable_scans: usize,
    grace_left: usize,
    history: [T; MEDIAN_LENGTH],
    history_len: usize,

    sample_rate: usize,
    lock_confidence: T,
    lock_scans: usize,
    tolerance: T,
    grace: usize,
}

impl<T> StabilityTracker<T>
where
    T: Float,
{
    pub fn new(sample_rate: usize, config: &DetectorConfig) -> Self {
        StabilityTracker {
            mode: TrackerMode::Idle,
            gate_open: false,
            frequency: T::zero(),
            clarity: T::zero(),
            previous_lag: None,
            stable_scans: 0,
            grace_left: 0,
            history: [T::zero(); MEDIAN_LENGTH],
            history_len: 0,
            sample_rate,
            lock_confidence: from_f64(config.lock_confidence),
            lock_scans: config.lock_scans,
            tolerance: from_f64(config.stability_tolerance),
            grace: config.release_grace.samples(sample_rate),
        }
    }

    /// Advance by one sample. `estimate` is present only on samples that
    /// completed a scan. Returns `true` when a new frequency was committed.
    pub fn update(&mut self, gate_open: bool, estimate: Option<PeriodEstimate<T>>) -> bool {
        self.gate_open = gate_open;
        if !gate_open {
            self.close_gate();
            return false;
        }

        match self.mode {
            TrackerMode::Idle => self.transition(TrackerMode::Acquiring),
            TrackerMode::Releasing => {
                // The held value stays visible, but the next confirmed
                // estimate starts a fresh history.
                self.history_len = 0;
                self.transition(TrackerMode::Locked);
            }
            _ => {}
        }

        let estimate = match estimate {
            Some(estimate) => estimate,
            None => return false,
        };
        if estimate.confidence < self.lock_confidence || estimate.lag <= T::zero() {
            self.stable_scans = 0;
            self.previous_lag = None;
            return false;
        }

        let lag = estimate.lag;
        let previous = self.previous_lag.unwrap_or(lag);
        let agrees = self.previous_lag.is_some() && self.within_tolerance(lag, previous);
        self.stable_scans = if agrees { self.stable_scans + 1 } else { 1 };
        self.previous_lag = Some(lag);

        match self.mode {
            TrackerMode::Acquiring if self.stable_scans >= self.lock_scans => {
                self.transition(TrackerMode::Locked);
                self.history[0] = lag;
                self.history_len = 1;
            }
            // A jump is held back until the next scan confirms it.
            TrackerMode::Locked if agrees => {
                if self.is_new_note(lag) {
                    self.history[0] = previous;
                    self.history[1] = lag;
                    self.history_len = 2;
                } else {
                    self.push_history(lag);
                }
            }
            _ => return false,
        }

        self.frequency = to_frequency(self.median(), self.sample_rate);
        self.clarity = estimate.confidence;
        true
    }

    /// The committed frequency while Locked or Releasing, `0` otherwise.
    pub fn frequency(&self) -> T {
        match self.mode {
            TrackerMode::Locked | TrackerMode::Releasing => self.frequency,
            TrackerMode::Idle | TrackerMode::Acquiring => T::zero(),
        }
    }

    /// Confidence of the estimate behind the committed frequency.
    pub fn clarity(&self) -> T {
        self.clarity
    }

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }

    pub fn is_locked(&self) -> bool {
        self.mode == TrackerMode::Locked
    }

    /// Whether the last sample was above the gate.
    pub fn gate_open(&self) -> bool {
        self.gate_open
    }

    pub fn reset(&mut self) {
        self.mode = TrackerMode::Idle;
        self.gate_open = false;
        self.frequency = T::zero();
        self.clarity = T::zero();
        self.previous_lag = None;
        self.stable_scans = 0;
        self.grace_left = 0;
        self.history_len = 0;
    }

    fn close_gate(&mut self) {
        match self.mode {
            TrackerMode::Locked if self.grace == 0 => self.release(),
            TrackerMode::Locked => {
                self.grace_left = self.grace;
                self.transition(TrackerMode::Releasing);
            }
            TrackerMode::Releasing => {
                self.grace_left = self.grace_left.saturating_sub(1);
                if self.grace_left == 0 {
                    self.release();
                }
            }
            TrackerMode::Acquiring => self.transition(TrackerMode::Idle),
            TrackerMode::Idle => {}
        }
        self.stable_scans = 0;
        self.previous_lag = None;
    }

    fn release(&mut self) {
        self.transition(TrackerMode::Idle);
        self.frequency = T::zero();
        self.clarity = T::zero();
        self.history_len = 0;
    }

    fn within_tolerance(&self, lag: T, reference: T) -> bool {
        (lag - reference).abs() <= self.tolerance * lag
    }

    /// A confirmed lag that the current history does not agree with.
    fn is_new_note(&self, lag: T) -> bool {
        self.history_len == 0 || !self.within_tolerance(lag, self.median())
    }

    fn transition(&mut self, to: TrackerMode) {
        log::debug!("tracker {:?} -> {:?}", self.mode, to);
        self.mode = to;
    }

    fn push_history(&mut self, lag: T) {
        if self.history_len < MEDIAN_LENGTH {
            self.history[self.history_len] = lag;
            self.history_len += 1;
        } else {
            self.history.rotate_left(1);
            self.history[MEDIAN_LENGTH - 1] = lag;
        }
    }

    fn median(&self) -> T {
        let mut sorted = self.history;
        let values = &mut sorted[..self.history_len];
        values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        values[self.history_len / 2]
    }
}
