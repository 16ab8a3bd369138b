//! Sentence boundary location inside multi-run paragraphs.
//!
//! A paragraph's text is spread over runs that each carry their own
//! formatting. To insert a sentence without disturbing that formatting the
//! payload is spliced into a single run, right where a sentence ends.

mod locator;

pub use locator::{
    splice_text, OffsetPolicy, SentenceLocator, SentencePosition, SplicePoint, SENTENCE_TERMINATOR,
};
