//! Sub-sample location of zero crossings.
use crate::float::{from_f64, Float};

const NEWTON_STEPS: usize = 4;

/// Locate the zero crossing between the last two of four consecutive samples.
///
/// `history` holds samples at times -2, -1, 0 and 1, with `history[2] < 0 <= history[3]`.
/// The cubic through all four points is solved by Newton iteration starting
/// from the linear estimate, giving the fraction in `[0, 1]` of the way from
/// time 0 to time 1 where the signal crosses zero. If the cubic misbehaves the
/// linear estimate is returned.
pub fn zero_crossing<T: Float>(history: &[T; 4]) -> T {
    let [y0, y1, y2, y3] = *history;
    let linear = -y2 / (y3 - y2);

    let half = from_f64::<T>(0.5);
    let sixth = T::one() / from_f64::<T>(6.0);
    let third = T::one() / from_f64::<T>(3.0);

    // Lagrange interpolation on nodes -2, -1, 0, 1 in power form.
    let a = (y3 - y0) * sixth + (y1 - y2) * half;
    let b = (y1 + y3) * half - y2;
    let c = y0 * sixth - y1 + y2 * half + y3 * third;
    let d = y2;

    let three = from_f64::<T>(3.0);
    let two = from_f64::<T>(2.0);
    let mut x = linear;
    for _ in 0..NEWTON_STEPS {
        let slope = (three * a * x + two * b) * x + c;
        if slope == T::zero() {
            break;
        }
        let value = ((a * x + b) * x + c) * x + d;
        x = x - value / slope;
    }

    if x.is_finite() && x >= T::zero() && x <= T::one() {
        x
    } else {
        linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample<F: Fn(f64) -> f64>(f: F) -> [f64; 4] {
        [f(-2.0), f(-1.0), f(0.0), f(1.0)]
    }

    #[test]
    fn exact_on_cubics() {
        let history = sample(|x| (x - 0.3) * (x * x + 1.0));
        assert!((zero_crossing(&history) - 0.3).abs() < 1e-12);

        let history = sample(|x| 2.0 * (x - 0.85) - 0.5 * (x - 0.85).powi(3));
        assert!((zero_crossing(&history) - 0.85).abs() < 1e-12);
    }

    #[test]
    fn exact_on_lines() {
        let history = sample(|x| 4.0 * x - 1.0);
        assert!((zero_crossing(&history) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn beats_linear_on_a_sine() {
        let w = 2.0 * std::f64::consts::PI / 50.0;
        let phase = 0.37;
        let history = sample(|x| (w * (x - phase)).sin() + 0.2 * (2.0 * w * (x - phase)).sin());
        let cubic = zero_crossing(&history);
        let linear = -history[2] / (history[3] - history[2]);
        assert!((cubic - phase).abs() < (linear - phase).abs());
        assert!((cubic - phase).abs() < 1e-4);
    }

    #[test]
    fn works_in_f32() {
        let history: [f32; 4] = [-3.0, -2.0, -1.0, 1.0];
        let x = zero_crossing(&history);
        assert!(x >= 0.0 && x <= 1.0);
    }
}
