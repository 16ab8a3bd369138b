//! Resolving directives against a parsed contract.
//!
//! A [`Resolution`] says exactly what edit a directive maps to in one
//! document, or why it cannot be applied. Resolving never modifies the
//! document, so the same directive over the same document always resolves
//! the same way.

use thiserror::Error;
use tracing::debug;

use crate::config::FALLBACK_LIST_ID;
use crate::document::{ContractDocument, NumberingRef};
use crate::error::Result;
use crate::numbering::{level_for_section_label, locate_section, LevelIndex, ListId};
use crate::sentence::{OffsetPolicy, SentenceLocator, SplicePoint};
use crate::types::{InsertionDirective, InsertionMode};

/// Why a directive was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The instruction matched neither supported phrasing.
    #[error("instruction phrasing not recognised")]
    UnrecognizedPhrasing,

    /// No paragraph displays the target label.
    #[error("section {section} not found")]
    SectionNotFound { section: String },

    /// The sentence ordinal word was not recognised.
    #[error("sentence ordinal not recognised for section {section}")]
    MissingOrdinal { section: String },

    /// The section has fewer sentences than the ordinal asks for.
    #[error("section {section} has no sentence {ordinal}")]
    SentenceNotFound { section: String, ordinal: u32 },

    /// The run holding the sentence end has no character data to edit.
    #[error("run {run} of section {section} has no editable text")]
    EmptyRun { section: String, run: usize },
}

/// What a directive maps to in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Insert a new numbered paragraph before `paragraph_index`.
    InsertSection {
        paragraph_index: usize,
        level: LevelIndex,
        list_id: ListId,
    },

    /// Splice the payload into paragraph `paragraph_index`.
    InsertSentence {
        paragraph_index: usize,
        splice: SplicePoint,
    },

    /// Leave the document untouched.
    Skipped(SkipReason),
}

impl Resolution {
    /// Apply the resolution to `document`, returning the edited document.
    ///
    /// Returns `None` for [`Resolution::Skipped`].
    ///
    /// # Errors
    /// Returns an error if the edit fails.
    pub fn apply(
        &self,
        document: &ContractDocument,
        text: &str,
    ) -> Result<Option<ContractDocument>> {
        match self {
            Self::InsertSection {
                paragraph_index,
                level,
                list_id,
            } => {
                let numbering = NumberingRef::new(list_id.clone(), *level);
                document
                    .insert_section(*paragraph_index, &numbering, text)
                    .map(Some)
            }
            Self::InsertSentence {
                paragraph_index,
                splice,
            } => document
                .insert_sentence(*paragraph_index, *splice, text)
                .map(Some),
            Self::Skipped(_) => Ok(None),
        }
    }
}

/// Maps directives onto documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    locator: SentenceLocator,
}

impl Resolver {
    /// Create a resolver placing sentences with `policy`.
    #[must_use]
    pub fn new(policy: OffsetPolicy) -> Self {
        Self {
            locator: SentenceLocator::new(policy),
        }
    }

    /// Resolve `directive` against `document`.
    #[must_use]
    pub fn resolve(
        &self,
        document: &ContractDocument,
        directive: &InsertionDirective,
    ) -> Resolution {
        match &directive.mode {
            InsertionMode::Unrecognized => Resolution::Skipped(SkipReason::UnrecognizedPhrasing),
            InsertionMode::AsNewSection { section } => resolve_section(document, section),
            InsertionMode::WithinSection {
                section,
                sentence_after,
            } => self.resolve_sentence(document, section, *sentence_after, &directive.text),
        }
    }

    fn resolve_sentence(
        &self,
        document: &ContractDocument,
        section: &str,
        sentence_after: Option<u32>,
        payload: &str,
    ) -> Resolution {
        let Some(ordinal) = sentence_after else {
            return Resolution::Skipped(SkipReason::MissingOrdinal {
                section: section.to_string(),
            });
        };
        let Some((paragraph_index, paragraph)) = find_section(document, section) else {
            return Resolution::Skipped(SkipReason::SectionNotFound {
                section: section.to_string(),
            });
        };

        let fragments = paragraph.fragments();
        let Some(splice) = self.locator.splice_point(&fragments, ordinal, payload) else {
            return Resolution::Skipped(SkipReason::SentenceNotFound {
                section: section.to_string(),
                ordinal,
            });
        };

        let editable = paragraph
            .runs
            .get(splice.fragment_index)
            .and_then(|run| run.text_position(splice.char_offset))
            .is_some();
        if !editable {
            return Resolution::Skipped(SkipReason::EmptyRun {
                section: section.to_string(),
                run: splice.fragment_index,
            });
        }

        debug!(
            section = %section,
            paragraph = paragraph_index,
            run = splice.fragment_index,
            offset = splice.char_offset,
            "resolved sentence insertion"
        );

        Resolution::InsertSentence {
            paragraph_index,
            splice,
        }
    }
}

fn find_section<'a>(
    document: &'a ContractDocument,
    section: &str,
) -> Option<(usize, &'a crate::document::Paragraph)> {
    let labels = document.labels();
    let index = locate_section(&labels, section)?;
    Some((index, document.paragraph(index)?))
}

/// The new section goes before the one carrying the label, at the level the
/// label implies and in the list of the paragraph it displaces.
fn resolve_section(document: &ContractDocument, section: &str) -> Resolution {
    let Some((paragraph_index, base)) = find_section(document, section) else {
        return Resolution::Skipped(SkipReason::SectionNotFound {
            section: section.to_string(),
        });
    };

    let level = level_for_section_label(section)
        .or_else(|| base.numbering.as_ref().map(|n| n.level))
        .unwrap_or(0);
    let list_id = base
        .numbering
        .as_ref()
        .map_or_else(|| ListId::new(FALLBACK_LIST_ID), |n| n.list.clone());

    debug!(
        section = %section,
        paragraph = paragraph_index,
        level,
        list = %list_id,
        "resolved section insertion"
    );

    Resolution::InsertSection {
        paragraph_index,
        level,
        list_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContractId;
    use pretty_assertions::assert_eq;

    fn document() -> ContractDocument {
        let numbered = |num_id: &str, ilvl: u32, text: &str| {
            format!(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="{ilvl}"/><w:numId w:val="{num_id}"/></w:numPr></w:pPr><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#
            )
        };
        let body = [
            r#"<w:p><w:r><w:t>SERVICES AGREEMENT</w:t></w:r></w:p>"#.to_string(),
            numbered("7", 0, "Definitions. Terms are defined here."),
            numbered("7", 1, "Services. The Supplier provides services."),
            numbered("7", 2, "Support. Support is included. Hours are 9 to 5."),
            numbered("7", 0, "Fees. Fees are due monthly. Late fees apply."),
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="7"/></w:numPr></w:pPr><w:r><w:t>Term</w:t></w:r><w:r><w:tab/></w:r></w:p>"#.to_string(),
        ]
        .concat();

        ContractDocument::parse(format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        ))
        .unwrap()
    }

    fn directive(mode: InsertionMode) -> InsertionDirective {
        InsertionDirective::new(ContractId::new("1"), mode, "Inserted text.")
    }

    fn as_section(section: &str) -> InsertionDirective {
        directive(InsertionMode::AsNewSection {
            section: section.to_string(),
        })
    }

    fn within(section: &str, sentence_after: Option<u32>) -> InsertionDirective {
        directive(InsertionMode::WithinSection {
            section: section.to_string(),
            sentence_after,
        })
    }

    #[test]
    fn test_fixture_labels() {
        assert_eq!(document().labels(), vec!["", "1", "1A", "1A(a)", "2", "3"]);
    }

    #[test]
    fn test_resolve_new_top_level_section() {
        let resolution = Resolver::default().resolve(&document(), &as_section("2"));
        assert_eq!(
            resolution,
            Resolution::InsertSection {
                paragraph_index: 4,
                level: 0,
                list_id: ListId::new("7"),
            }
        );
    }

    #[test]
    fn test_resolve_new_second_level_section() {
        let resolution = Resolver::default().resolve(&document(), &as_section("1A"));
        assert_eq!(
            resolution,
            Resolution::InsertSection {
                paragraph_index: 2,
                level: 1,
                list_id: ListId::new("7"),
            }
        );
    }

    #[test]
    fn test_resolve_unusual_label_uses_base_level() {
        let resolution = Resolver::default().resolve(&document(), &as_section("1A(a)"));
        assert_eq!(
            resolution,
            Resolution::InsertSection {
                paragraph_index: 3,
                level: 2,
                list_id: ListId::new("7"),
            }
        );
    }

    #[test]
    fn test_resolve_missing_section() {
        let resolution = Resolver::default().resolve(&document(), &as_section("9"));
        assert_eq!(
            resolution,
            Resolution::Skipped(SkipReason::SectionNotFound {
                section: "9".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_sentence_insertion() {
        let resolution = Resolver::default().resolve(&document(), &within("2", Some(2)));
        assert_eq!(
            resolution,
            Resolution::InsertSentence {
                paragraph_index: 4,
                splice: SplicePoint {
                    fragment_index: 0,
                    char_offset: 27,
                },
            }
        );
    }

    #[test]
    fn test_resolve_sentence_not_found() {
        let resolution = Resolver::default().resolve(&document(), &within("1", Some(5)));
        assert_eq!(
            resolution,
            Resolution::Skipped(SkipReason::SentenceNotFound {
                section: "1".to_string(),
                ordinal: 5,
            })
        );
    }

    #[test]
    fn test_resolve_missing_ordinal() {
        let resolution = Resolver::default().resolve(&document(), &within("1", None));
        assert_eq!(
            resolution,
            Resolution::Skipped(SkipReason::MissingOrdinal {
                section: "1".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_unrecognized() {
        let unrecognized = directive(InsertionMode::Unrecognized);
        let resolution = Resolver::default().resolve(&document(), &unrecognized);
        assert_eq!(
            resolution,
            Resolution::Skipped(SkipReason::UnrecognizedPhrasing)
        );
    }

    #[test]
    fn test_resolve_legacy_offsets() {
        // "Inserted text." has its only terminator at char 13
        let resolver = Resolver::new(OffsetPolicy::Payload);
        let resolution = resolver.resolve(&document(), &within("2", Some(1)));
        assert_eq!(
            resolution,
            Resolution::InsertSentence {
                paragraph_index: 4,
                splice: SplicePoint {
                    fragment_index: 0,
                    char_offset: 13,
                },
            }
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let doc = document();
        let directive = within("1A(a)", Some(1));
        let resolver = Resolver::default();
        assert_eq!(
            resolver.resolve(&doc, &directive),
            resolver.resolve(&doc, &directive)
        );
    }

    #[test]
    fn test_apply_section_then_relabel() {
        let doc = document();
        let resolution = Resolver::default().resolve(&doc, &as_section("2"));
        let edited = resolution
            .apply(&doc, "Insurance. Keep cover.")
            .unwrap()
            .unwrap();

        assert_eq!(edited.labels(), vec!["", "1", "1A", "1A(a)", "2", "3", "4"]);
        assert_eq!(edited.paragraphs()[4].text(), "Insurance. Keep cover. ");
        assert_eq!(
            edited.paragraphs()[5].text(),
            "Fees. Fees are due monthly. Late fees apply."
        );
    }

    #[test]
    fn test_apply_sentence() {
        let doc = document();
        let directive = within("1A(a)", Some(2));
        let resolution = Resolver::default().resolve(&doc, &directive);
        let edited = resolution.apply(&doc, &directive.text).unwrap().unwrap();

        assert_eq!(
            edited.paragraphs()[3].text(),
            "Support. Support is included. Inserted text. Hours are 9 to 5."
        );
    }

    #[test]
    fn test_apply_skipped_is_noop() {
        let doc = document();
        let resolution = Resolution::Skipped(SkipReason::UnrecognizedPhrasing);
        assert!(resolution.apply(&doc, "x").unwrap().is_none());
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::SentenceNotFound {
            section: "11".to_string(),
            ordinal: 3,
        };
        assert_eq!(reason.to_string(), "section 11 has no sentence 3");
    }
}
