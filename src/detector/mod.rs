use crate::float::Float;

pub mod bitstream;
pub mod conditioner;
pub mod correlator;
pub mod internals;
pub mod selector;
pub mod tracker;

/// A sample-by-sample pitch tracker.
pub trait PitchTracker<T>
where
    T: Float,
{
    /// Consume one sample. Returns `true` when a new frequency has been
    /// committed and can be read with [PitchTracker::frequency].
    fn process(&mut self, sample: T) -> bool;

    /// Last committed frequency in Hz, or `0` when there is no pitch.
    fn frequency(&self) -> T;

    /// Clear all history and return to the idle state.
    fn reset(&mut self);
}
