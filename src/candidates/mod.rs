//! Candidate password generation
//!
//! Candidates are fixed-length strings produced lazily by an [`Odometer`]: a
//! mixed-radix counter whose wheels are the symbols of one or more
//! [`Alphabet`]s. Nothing here knows about stages, workers, or archives.

pub mod alphabet;
pub mod odometer;

pub use alphabet::{Alphabet, AlphabetSpec};
pub use odometer::{Odometer, Segment};
