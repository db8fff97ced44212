//! Test-signal synthesis: oscillators and an amplitude envelope.
pub mod envelope;
pub mod oscillator;
