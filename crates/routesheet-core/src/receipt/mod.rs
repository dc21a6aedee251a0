//! Receipt text to record extraction.

pub mod accumulator;
pub mod classifier;
pub mod dates;
pub mod rules;

pub use accumulator::{RecordAccumulator, accumulate};
pub use classifier::LineClassifier;
pub use dates::{expiration_for, first_of_month};
pub use rules::{LineFact, LineRule};
