//! Editing a contract by splicing its XML source.
//!
//! Every edit produces a new [`ContractDocument`] parsed from the edited
//! source, so paragraph indices and labels are always current.

use std::ops::Range;

use tracing::debug;

use super::model::{ContractDocument, NumberingRef, RunPiece};
use super::style::section_paragraph_xml;
use crate::error::{InserterError, Result};
use crate::sentence::SplicePoint;
use crate::xml::{escape_text, raw_offset_for_char};

const PRESERVE: &str = "preserve";

impl ContractDocument {
    /// Insert a numbered paragraph holding `text` before paragraph `index`,
    /// formatted after that paragraph.
    ///
    /// # Errors
    /// Returns an error if `index` is out of range or the edited source does
    /// not parse.
    pub fn insert_section(
        &self,
        index: usize,
        numbering: &NumberingRef,
        text: &str,
    ) -> Result<Self> {
        let xml = section_paragraph_xml(self, index, numbering, text)
            .ok_or_else(|| self.out_of_range(index))?;
        self.insert_paragraph_before(index, &xml)
    }

    /// Insert raw paragraph XML before paragraph `index`.
    ///
    /// # Errors
    /// Returns an error if `index` is out of range or the edited source does
    /// not parse.
    pub fn insert_paragraph_before(&self, index: usize, xml: &str) -> Result<Self> {
        let at = self
            .paragraph(index)
            .map(|p| p.range.start)
            .ok_or_else(|| self.out_of_range(index))?;

        debug!(paragraph = index, bytes = xml.len(), "inserting paragraph");
        Self::parse(splice(&self.source, &[(at..at, xml)]))
    }

    /// Insert `" " + payload` into paragraph `index` at `point`.
    ///
    /// The character data is edited in place, so the run keeps its
    /// formatting. The `w:t` element is marked `xml:space="preserve"` when it
    /// is not already, so the leading space survives.
    ///
    /// # Errors
    /// Returns an error if the paragraph or run does not exist, the run has
    /// no text to edit, or the edited source does not parse.
    pub fn insert_sentence(&self, index: usize, point: SplicePoint, payload: &str) -> Result<Self> {
        let paragraph = self
            .paragraph(index)
            .ok_or_else(|| self.out_of_range(index))?;
        let run = paragraph
            .runs
            .get(point.fragment_index)
            .ok_or(InserterError::UneditableRun {
                paragraph: index,
                run: point.fragment_index,
            })?;

        let text_piece = run
            .text_position(point.char_offset)
            .and_then(|(piece, offset)| match run.pieces.get(piece)? {
                RunPiece::Text { raw, space, .. } => Some((raw.clone(), space.clone(), offset)),
                RunPiece::Literal(_) => None,
            });
        let Some((raw, space, offset)) = text_piece else {
            return Err(InserterError::UneditableRun {
                paragraph: index,
                run: point.fragment_index,
            });
        };

        let at = raw.start + raw_offset_for_char(self.slice(&raw), offset);
        let inserted = escape_text(&format!(" {payload}"));

        debug!(
            paragraph = index,
            run = point.fragment_index,
            offset = point.char_offset,
            "inserting sentence"
        );

        let mut edits: Vec<(Range<usize>, &str)> = Vec::with_capacity(2);
        match space {
            Some(value) if self.slice(&value) == PRESERVE => {}
            Some(value) => edits.push((value, PRESERVE)),
            // The start tag of `w:t` ends right before its character data
            None => {
                let tag_end = raw.start.saturating_sub(1);
                edits.push((tag_end..tag_end, r#" xml:space="preserve""#));
            }
        }
        edits.push((at..at, inserted.as_str()));

        Self::parse(splice(&self.source, &edits))
    }

    fn out_of_range(&self, index: usize) -> InserterError {
        InserterError::ParagraphOutOfRange {
            index,
            count: self.paragraphs.len(),
        }
    }
}

/// Replace byte ranges of `source`, given in ascending order and not
/// overlapping. An empty range is a plain insertion.
fn splice(source: &str, edits: &[(Range<usize>, &str)]) -> String {
    let extra: usize = edits.iter().map(|(_, text)| text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut last = 0;

    for (range, text) in edits {
        out.push_str(&source[last..range.start]);
        out.push_str(text);
        last = range.end;
    }
    out.push_str(&source[last..]);
    out
}
