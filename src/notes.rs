//! Read-only table of named note frequencies (equal temperament, A4 = 440 Hz).

use crate::units::Frequency;

pub const LOW_E: Frequency = Frequency::hz(82.4069);
pub const A: Frequency = Frequency::hz(110.0);
pub const D: Frequency = Frequency::hz(146.8324);
pub const G: Frequency = Frequency::hz(195.9977);
pub const B: Frequency = Frequency::hz(246.9417);
pub const HIGH_E: Frequency = Frequency::hz(329.6276);

pub const MIDDLE_C: Frequency = Frequency::hz(261.6256);
pub const MIDDLE_A: Frequency = Frequency::hz(440.0);

/// Open strings of a guitar in standard tuning, lowest first.
pub const GUITAR_STRINGS: [(&str, Frequency); 6] = [
    ("low E", LOW_E),
    ("A", A),
    ("D", D),
    ("G", G),
    ("B", B),
    ("high E", HIGH_E),
];

/// The note `frets` semitones above `open`.
pub fn fret(open: Frequency, frets: u32) -> Frequency {
    open.transpose(frets as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelfth_fret_is_an_octave() {
        for (_, open) in GUITAR_STRINGS.iter() {
            let octave = fret(*open, 12);
            assert!((octave.as_hz() - 2.0 * open.as_hz()).abs() < 1e-9);
        }
    }

    #[test]
    fn strings_are_ascending() {
        assert!(GUITAR_STRINGS.windows(2).all(|w| w[0].1 < w[1].1));
        assert!((HIGH_E.as_hz() - 4.0 * LOW_E.as_hz()).abs() < 1e-3);
    }
}
