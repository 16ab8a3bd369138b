//! Outline numbering reconstruction.
//!
//! Rebuilds the labels ("1", "1A", "1A(a)", "1A(a)(i)") that numbered
//! paragraphs display, so that sections can be found by the label a reader
//! sees in the contract.

mod label;
mod section;
mod tracker;

pub use label::{format_label, to_letter, to_lower_letter, to_roman};
pub use section::{level_for_section_label, locate_section};
pub use tracker::{label_sequence, CounterState, LevelIndex, ListId, NumberingTracker};
