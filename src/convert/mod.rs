//! Conversions between frequencies, cents, scale degrees and note names.

pub(crate) const A4_HZ: f32 = 440.0;
pub(crate) const MIDI_A4: f32 = 69.0;

mod cents;
mod degree;
mod notes;

pub use cents::*;
pub(crate) use cents::check_frequency;
pub use degree::*;
pub use notes::*;

#[cfg(test)]
mod tests;
