//! Instruction document parsing.
//!
//! The instruction document lists, per contract, one instruction sentence
//! and the text to insert:
//!
//! ```text
//! Contract 1:
//! Insert this clause as section 1A
//!
//! The Supplier shall maintain insurance.
//! ```

mod matchers;
mod parser;
mod source;

pub use matchers::{classify, ordinal_value, Matcher, MATCHERS};
pub use parser::{parse_instructions, parse_instructions_detailed, ParsedInstructions, SkippedBlock};
pub use source::{instruction_text_from_xml, read_instruction_text};
