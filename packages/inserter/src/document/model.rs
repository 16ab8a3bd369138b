//! In-memory view of a contract document.
//!
//! The model keeps the original XML source and, for every paragraph and
//! run, the byte ranges it occupies there. Edits are made by splicing the
//! source text, which leaves everything the model does not understand
//! untouched.

use std::ops::Range;

use crate::numbering::{label_sequence, LevelIndex, ListId};

/// Numbering applied to a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingRef {
    pub list: ListId,
    pub level: LevelIndex,
}

impl NumberingRef {
    #[must_use]
    pub fn new(list: ListId, level: LevelIndex) -> Self {
        Self { list, level }
    }
}

/// Part of a run's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPiece {
    /// Character data of a `w:t` element.
    Text {
        /// Decoded text.
        text: String,
        /// Raw character data in the source.
        raw: Range<usize>,
        /// Value of the `w:t` element's `xml:space` attribute in the
        /// source, if it has one.
        space: Option<Range<usize>>,
    },
    /// A tab or break, rendered as a single character.
    Literal(char),
}

impl RunPiece {
    fn char_len(&self) -> usize {
        match self {
            Self::Text { text, .. } => text.chars().count(),
            Self::Literal(_) => 1,
        }
    }
}

/// A run of uniformly formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Whole `w:r` element in the source.
    pub range: Range<usize>,
    /// `w:rPr` element in the source, if present.
    pub properties: Option<Range<usize>>,
    /// Whether the run is directly formatted bold.
    pub bold: bool,
    pub pieces: Vec<RunPiece>,
}

impl Run {
    /// Text of the run as a reader sees it.
    #[must_use]
    pub fn text(&self) -> String {
        self.pieces
            .iter()
            .map(|piece| match piece {
                RunPiece::Text { text, .. } => text.clone(),
                RunPiece::Literal(c) => c.to_string(),
            })
            .collect()
    }

    /// Find the text piece holding char `offset` of the run text.
    ///
    /// Returns the piece index and the offset inside it. An offset on the
    /// boundary between a text piece and what follows resolves to the end
    /// of that text piece.
    #[must_use]
    pub fn text_position(&self, offset: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        let mut last_text: Option<(usize, usize)> = None;

        for (index, piece) in self.pieces.iter().enumerate() {
            let len = piece.char_len();
            if let RunPiece::Text { .. } = piece {
                if offset >= start && offset <= start + len {
                    return Some((index, offset - start));
                }
                last_text = Some((index, len));
            } else if offset <= start {
                break;
            }
            start += len;
        }

        // Past the end of the run, or inside a tab/break: use the end of
        // the closest preceding text
        last_text
    }
}

/// A body paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Whole `w:p` element in the source.
    pub range: Range<usize>,
    /// `w:pPr` element in the source, if present.
    pub properties: Option<Range<usize>>,
    /// Paragraph style id (`w:pStyle`).
    pub style_id: Option<String>,
    /// Effective numbering, direct or inherited from the style.
    pub numbering: Option<NumberingRef>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Text of each run, in order.
    #[must_use]
    pub fn fragments(&self) -> Vec<String> {
        self.runs.iter().map(Run::text).collect()
    }

    /// Full paragraph text.
    #[must_use]
    pub fn text(&self) -> String {
        self.fragments().concat()
    }

    /// Whether the first run is bold, which marks a bold section heading.
    #[must_use]
    pub fn starts_bold(&self) -> bool {
        self.runs.first().is_some_and(|run| run.bold)
    }
}

/// A parsed contract document.
#[derive(Debug, Clone)]
pub struct ContractDocument {
    pub(crate) source: String,
    pub(crate) prefix: String,
    pub(crate) paragraphs: Vec<Paragraph>,
}

impl ContractDocument {
    /// The XML source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consume the document, returning its XML source.
    #[must_use]
    pub fn into_source(self) -> String {
        self.source
    }

    /// Body paragraphs in document order.
    #[must_use]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraph at `index`.
    #[must_use]
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Outline label of every paragraph, empty for unnumbered ones.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        label_sequence(
            self.paragraphs
                .iter()
                .map(|p| p.numbering.as_ref().map(|n| (&n.list, n.level))),
        )
    }

    /// Qualified name for a WordprocessingML element in this document.
    pub(crate) fn qname(&self, local: &str) -> String {
        if self.prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{local}", self.prefix)
        }
    }

    /// Source text of a range.
    pub(crate) fn slice(&self, range: &Range<usize>) -> &str {
        &self.source[range.clone()]
    }
}
