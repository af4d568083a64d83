//! Validation - turning the reviewer's reply into a verdict

pub mod verdict;

pub use verdict::{Verdict, VerdictMode};
