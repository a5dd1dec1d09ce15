//! Diagnostic attribution: deciding which parts of a checker report belong
//! to the file currently being processed.
//!
//! Everything in this crate is a pure function of its inputs: no I/O, no
//! shared state.

pub mod filter;
pub mod parse;
pub mod relevance;

pub use filter::{attribute, check_output, collapse_continuations, CheckOutcome};
pub use parse::{classify_output, synthetic_fatal, ParseOutcome};
pub use relevance::{ends_with_connective, fragment_relevant, is_fatal, CONNECTIVES};
