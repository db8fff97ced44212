//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use num_traits::{Float as NumFloat, FromPrimitive};
use std::fmt::{Debug, Display};

/// Signals are processed as streams of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloat + FromPrimitive {}

impl Float for f64 {}
impl Float for f32 {}

/// Convert an `f64` constant into `T`. Conversions into `f32`/`f64` cannot fail;
/// an exotic `T` that refuses the value gets NaN, which every comparison rejects.
#[inline]
pub fn from_f64<T: Float>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// Convert a sample count or index into `T`.
#[inline]
pub fn from_usize<T: Float>(value: usize) -> T {
    T::from_usize(value).unwrap_or_else(T::nan)
}
