use crate::float::{from_f64, Float};

pub struct Point<T: Float> {
    pub x: T,
    pub y: T,
}

/// Index of the largest value in `arr[start..end]`. Ties go to the lowest index.
pub fn local_peak<T: Float>(arr: &[T], start: usize, end: usize) -> Option<usize> {
    let end = end.min(arr.len());
    let mut best: Option<usize> = None;
    for i in start..end {
        match best {
            Some(b) if arr[i] <= arr[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Vertex of the parabola through three equally spaced points.
pub fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Point<T> {
    let shift = from_f64::<T>(0.5) * (right.y - left.y)
        / (from_f64::<T>(2.0) * center.y - left.y - right.y);
    let x = center.x + shift;
    let y = center.y + from_f64::<T>(0.25) * (right.y - left.y) * shift;
    Point { x, y }
}

/// Offset in `[-0.5, 0.5]` of the parabolic vertex around a local maximum
/// `center`. Returns zero when the three values do not bend downwards.
pub fn parabolic_offset<T: Float>(left: T, center: T, right: T) -> T {
    let half = from_f64::<T>(0.5);
    let bend = left - from_f64::<T>(2.0) * center + right;
    if bend >= T::zero() {
        return T::zero();
    }
    let vertex = quadratic_interpolation(
        Point {
            x: -T::one(),
            y: left,
        },
        Point {
            x: T::zero(),
            y: center,
        },
        Point { x: T::one(), y: right },
    );
    vertex.x.max(-half).min(half)
}

/// Peak height of a symmetric triangle through three equally spaced points
/// around a local maximum `center`.
///
/// Agreement scores of a bitstream fall off linearly on both sides of a true
/// period, so this recovers the height lost to an integer lag that misses the
/// period by a fraction.
pub fn triangle_peak<T: Float>(left: T, center: T, right: T) -> T {
    center + (right - left).abs() * from_f64::<T>(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_correction() {
        let point = quadratic_interpolation(
            Point {
                x: -1.5,
                y: -(1.5 * 1.5) + 4.0,
            },
            Point {
                x: -0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
            Point {
                x: 0.5,
                y: -(0.5 * 0.5) + 4.0,
            },
        );
        assert_eq!(point.x, 0.0);
        assert_eq!(point.y, 4.0);
    }

    #[test]
    fn parabolic_offset_is_bounded() {
        // y = -(x - 0.25)^2
        let f = |x: f64| -(x - 0.25) * (x - 0.25);
        assert!((parabolic_offset(f(-1.0), f(0.0), f(1.0)) - 0.25).abs() < 1e-12);
        // Flat or upward-bent data has no vertex to move to.
        assert_eq!(parabolic_offset(1.0, 1.0, 1.0), 0.0);
        assert_eq!(parabolic_offset(2.0, 1.0, 2.0), 0.0);
        // A vertex past the neighbouring sample is clamped to half a sample.
        assert_eq!(parabolic_offset(0.0, 1.0, 1.5), 0.5);
    }

    #[test]
    fn triangle_recovers_height() {
        // Triangle peaked at x = 0.3 with height 1 and slope 0.1 per sample.
        let f = |x: f64| 1.0 - 0.1 * (x - 0.3f64).abs();
        let height = triangle_peak(f(-1.0), f(0.0), f(1.0));
        assert!((height - 1.0).abs() < 1e-12);
    }

    #[test]
    fn local_peak_prefers_first_maximum() {
        let values = [0.1, 0.5, 0.9, 0.9, 0.2];
        assert_eq!(local_peak(&values, 0, 5), Some(2));
        assert_eq!(local_peak(&values, 3, 10), Some(3));
        assert_eq!(local_peak(&values, 4, 4), None);
    }
}
