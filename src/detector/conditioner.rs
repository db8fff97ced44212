use crate::config::DetectorConfig;
use crate::float::{from_f64, Float};
use crate::units::Decibel;
use crate::utils::buffer::Edge;
use crate::utils::crossing::zero_crossing;
use crate::utils::filters::EnvelopeFollower;

/// Turns raw samples into a one-bit stream.
///
/// The bit goes high when the signal rises above `+band` and low when it falls
/// below `-band`, where `band` is a fixed fraction of the peak envelope. While
/// the envelope sits under the gate the conditioner reports no signal.
///
/// Rising zero crossings are timed to a fraction of a sample. A crossing only
/// becomes an [Edge] once the bit goes high after it, so crossings inside the
/// hysteresis band never count. Each edge also carries the highest sample
/// seen since the previous edge.
#[derive(Debug, Clone)]
pub struct SignalConditioner<T>
where
    T: Float,
{
    envelope: EnvelopeFollower<T>,
    hysteresis: T,
    gate: T,
    history: [T; 4],
    bit: bool,
    pending: Option<Edge<T>>,
    confirmed: Option<Edge<T>>,
    cycle_peak: Option<T>,
    samples: u64,
}

impl<T> SignalConditioner<T>
where
    T: Float,
{
    pub fn new(gate: Decibel, sample_rate: usize, config: &DetectorConfig) -> Self {
        SignalConditioner {
            envelope: EnvelopeFollower::with_release_time(config.envelope_release, sample_rate),
            hysteresis: from_f64(config.hysteresis),
            gate: from_f64(gate.to_gain()),
            history: [T::zero(); 4],
            bit: false,
            pending: None,
            confirmed: None,
            cycle_peak: None,
            samples: 0,
        }
    }

    /// Encode one sample. `None` means the signal is under the gate.
    pub fn encode(&mut self, sample: T) -> Option<bool> {
        let index = self.samples;
        self.samples += 1;
        self.confirmed = None;

        let level = self.envelope.process(sample);
        self.history = [self.history[1], self.history[2], self.history[3], sample];
        if level < self.gate {
            self.pending = None;
            self.cycle_peak = None;
            return None;
        }

        let band = level * self.hysteresis;
        if self.history[2] < T::zero() && self.history[3] >= T::zero() {
            self.pending = Some(Edge {
                index: index.saturating_sub(1),
                fraction: zero_crossing(&self.history),
                peak: None,
            });
        }

        if !self.bit && sample > band {
            self.bit = true;
            if let Some(edge) = self.pending.take() {
                self.confirmed = Some(Edge {
                    peak: self.cycle_peak,
                    ..edge
                });
                self.cycle_peak = Some(T::zero());
            }
        } else if self.bit && sample < -band {
            self.bit = false;
        }
        self.cycle_peak = self.cycle_peak.map(|peak| peak.max(sample));
        Some(self.bit)
    }

    /// The edge confirmed by the last call to [SignalConditioner::encode], if any.
    pub fn confirmed_edge(&self) -> Option<Edge<T>> {
        self.confirmed
    }

    /// Number of samples encoded since construction or the last reset.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn envelope(&self) -> T {
        self.envelope.level()
    }

    pub fn reset(&mut self) {
        self.envelope.reset();
        self.history = [T::zero(); 4];
        self.bit = false;
        self.pending = None;
        self.confirmed = None;
        self.cycle_peak = None;
        self.samples = 0;
    }
}
