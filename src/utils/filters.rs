use crate::float::{from_f64, from_usize, Float};
use crate::units::Duration;

/// Peak envelope follower with instant attack and exponential release.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower<T>
where
    T: Float,
{
    level: T,
    release: T,
}

impl<T> EnvelopeFollower<T>
where
    T: Float,
{
    /// `release` is the per-sample decay factor in `(0, 1)`.
    pub fn new(release: T) -> Self {
        EnvelopeFollower {
            level: T::zero(),
            release,
        }
    }

    /// Follower whose level decays by a factor `e` over `release`.
    pub fn with_release_time(release: Duration, sample_rate: usize) -> Self {
        let samples = from_f64::<T>(release.as_seconds()) * from_usize::<T>(sample_rate);
        Self::new((-samples.recip()).exp())
    }

    pub fn process(&mut self, sample: T) -> T {
        let magnitude = sample.abs();
        if magnitude > self.level {
            self.level = magnitude;
        } else {
            self.level = self.level * self.release;
        }
        self.level
    }

    pub fn level(&self) -> T {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = T::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attacks_instantly_and_releases_slowly() {
        let mut env = EnvelopeFollower::<f64>::with_release_time(Duration::ms(10.0), 1000);
        assert_eq!(env.process(-0.8), 0.8);
        assert_eq!(env.process(0.1), 0.8 * (-0.1f64).exp());

        // 10 samples later the level has fallen by `e` (plus the first step).
        for _ in 0..9 {
            env.process(0.0);
        }
        assert!((env.level() - 0.8 * (-1.0f64).exp()).abs() < 1e-12);

        env.reset();
        assert_eq!(env.level(), 0.0);
    }
}
