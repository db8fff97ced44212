//! Attack-decay-sustain-release envelope generator.

use crate::units::{Decibel, Duration};

/// Below this level a releasing envelope is considered silent (-100 dB).
const SILENCE: f64 = 1e-5;

/// Envelope shape.
///
/// The attack is a linear ramp to full level. Decay approaches the sustain
/// level exponentially, the sustain level itself keeps sinking with its own
/// time constant, and the release falls exponentially to silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    /// Time of the linear ramp from zero to full level (default: 10 ms)
    pub attack: Duration,
    /// Time constant of the fall towards the sustain level (default: 200 ms)
    pub decay: Duration,
    /// Sustain level relative to the peak (default: -6 dB)
    pub sustain_level: Decibel,
    /// Time constant of the slow sink during sustain (default: 10 s)
    pub sustain_rate: Duration,
    /// Time constant of the release (default: 500 ms)
    pub release: Duration,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: Duration::ms(10.0),
            decay: Duration::ms(200.0),
            sustain_level: Decibel::db(-6.0),
            sustain_rate: Duration::seconds(10.0),
            release: Duration::ms(500.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeStage,
    level: f64,
    attack_step: f64,
    decay: f64,
    sustain: f64,
    sustain_decay: f64,
    release: f64,
}

impl Envelope {
    pub fn new(config: &EnvelopeConfig, sample_rate: usize) -> Self {
        let attack_samples = config.attack.samples(sample_rate).max(1);
        Envelope {
            stage: EnvelopeStage::Idle,
            level: 0.0,
            attack_step: 1.0 / attack_samples as f64,
            decay: coefficient(config.decay, sample_rate),
            sustain: config.sustain_level.to_gain().min(1.0),
            sustain_decay: coefficient(config.sustain_rate, sample_rate),
            release: coefficient(config.release, sample_rate),
        }
    }

    /// Start the attack from the current level.
    pub fn trigger(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Start the release from the current level.
    pub fn release(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Advance one sample and return the level in `[0, 1]`.
    pub fn next(&mut self) -> f64 {
        match self.stage {
            EnvelopeStage::Idle => self.level = 0.0,
            EnvelopeStage::Attack => {
                self.level += self.attack_step;
                if self.level >= 1.0 - 1e-9 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level = self.sustain + (self.level - self.sustain) * self.decay;
                if self.level - self.sustain < 1e-4 {
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => self.level *= self.sustain_decay,
            EnvelopeStage::Release => {
                self.level *= self.release;
                if self.level < SILENCE {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }
        self.level
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }
}

/// Per-sample factor of an exponential with time constant `time`.
fn coefficient(time: Duration, sample_rate: usize) -> f64 {
    let samples = time.as_seconds() * sample_rate as f64;
    if samples > 0.0 {
        (-1.0 / samples).exp()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_reaches_full_level() {
        let mut envelope = Envelope::new(&EnvelopeConfig::default(), 1000);
        assert_eq!(envelope.next(), 0.0);
        envelope.trigger();
        let levels: Vec<f64> = (0..10).map(|_| envelope.next()).collect();
        assert!(levels[0] < 0.2);
        assert_eq!(levels[9], 1.0);
        assert_eq!(envelope.stage(), EnvelopeStage::Decay);
    }

    #[test]
    fn decays_towards_sustain() {
        let mut envelope = Envelope::new(&EnvelopeConfig::default(), 1000);
        envelope.trigger();
        for _ in 0..3000 {
            envelope.next();
        }
        assert_eq!(envelope.stage(), EnvelopeStage::Sustain);
        let sustain = Decibel::db(-6.0).to_gain();
        let level = envelope.level();
        assert!(level < sustain && level > 0.8 * sustain, "level {}", level);
    }

    #[test]
    fn release_ends_idle() {
        let mut envelope = Envelope::new(&EnvelopeConfig::default(), 1000);
        envelope.trigger();
        for _ in 0..100 {
            envelope.next();
        }
        envelope.release();
        assert_eq!(envelope.stage(), EnvelopeStage::Release);
        let mut previous = envelope.level();
        while envelope.is_active() {
            let level = envelope.next();
            assert!(level <= previous);
            previous = level;
        }
        assert_eq!(envelope.level(), 0.0);
    }
}
