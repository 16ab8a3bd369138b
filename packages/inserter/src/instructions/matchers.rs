//! Named matchers for the two supported instruction phrasings.
//!
//! Matchers are tried in [`MATCHERS`] order and the first hit decides the
//! insertion mode.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::InsertionMode;

/// "Insert this clause as section 1A".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static AS_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bas\s+section\s+(\w+)").expect("valid regex"));

/// "between the second and third sentence in Section 11".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BETWEEN_SENTENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)between\s+the\s+(\w+)\s+and\s+(\w+)\s+sentence\s+in\s+section\s+(\w+)")
        .expect("valid regex")
});

/// Ordinal words understood in instructions.
const ORDINAL_WORDS: [(&str, u32); 10] = [
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
];

/// A named phrasing recogniser.
pub struct Matcher {
    /// Name used in logs.
    pub name: &'static str,
    /// Returns the insertion mode when the sentence uses this phrasing.
    pub matches: fn(&str) -> Option<InsertionMode>,
}

/// Matchers in priority order.
pub const MATCHERS: [Matcher; 2] = [
    Matcher {
        name: "as",
        matches: match_as_section,
    },
    Matcher {
        name: "between",
        matches: match_between_sentences,
    },
];

/// Classify an instruction sentence.
///
/// Falls back to [`InsertionMode::Unrecognized`] when no matcher applies.
///
/// # Examples
/// ```
/// use clause_inserter::instructions::classify;
/// use clause_inserter::types::InsertionMode;
///
/// assert_eq!(
///     classify("Insert this clause as section 1A"),
///     InsertionMode::AsNewSection { section: "1A".to_string() }
/// );
/// assert_eq!(classify("Please tidy up"), InsertionMode::Unrecognized);
/// ```
#[must_use]
pub fn classify(sentence: &str) -> InsertionMode {
    for matcher in &MATCHERS {
        if let Some(mode) = (matcher.matches)(sentence) {
            tracing::debug!(matcher = matcher.name, "Instruction phrasing recognised");
            return mode;
        }
    }
    InsertionMode::Unrecognized
}

fn match_as_section(sentence: &str) -> Option<InsertionMode> {
    let caps = AS_SECTION.captures(sentence)?;
    Some(InsertionMode::AsNewSection {
        section: caps.get(1)?.as_str().to_string(),
    })
}

fn match_between_sentences(sentence: &str) -> Option<InsertionMode> {
    let caps = BETWEEN_SENTENCES.captures(sentence)?;
    let first = caps.get(1)?.as_str();
    let second = caps.get(2)?.as_str();
    let section = caps.get(3)?.as_str().to_string();

    let sentence_after = ordinal_value(first);
    if let (Some(a), Some(b)) = (sentence_after, ordinal_value(second)) {
        if b != a + 1 {
            tracing::warn!(
                first = a,
                second = b,
                section = %section,
                "Ordinals are not adjacent, inserting after the first one"
            );
        }
    }

    Some(InsertionMode::WithinSection {
        section,
        sentence_after,
    })
}

/// Value of an ordinal word, "first" through "tenth".
///
/// Matching ignores case and a trailing English ordinal suffix. Anything
/// outside the table, numerals such as "2nd" included, gives `None`.
///
/// # Examples
/// ```
/// use clause_inserter::instructions::ordinal_value;
///
/// assert_eq!(ordinal_value("second"), Some(2));
/// assert_eq!(ordinal_value("Third"), Some(3));
/// assert_eq!(ordinal_value("3rd"), None);
/// assert_eq!(ordinal_value("eleventh"), None);
/// ```
#[must_use]
pub fn ordinal_value(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    let lookup = |w: &str| {
        ORDINAL_WORDS
            .iter()
            .find(|(name, _)| *name == w)
            .map(|&(_, value)| value)
    };

    lookup(&word).or_else(|| {
        ["st", "nd", "rd", "th"]
            .iter()
            .find_map(|suffix| word.strip_suffix(suffix))
            .and_then(lookup)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_as_section() {
        assert_eq!(
            classify("Insert this clause as section 1A"),
            InsertionMode::AsNewSection {
                section: "1A".to_string()
            }
        );
    }

    #[test]
    fn test_classify_as_section_case_insensitive() {
        assert_eq!(
            classify("INSERT THE FOLLOWING AS SECTION 4"),
            InsertionMode::AsNewSection {
                section: "4".to_string()
            }
        );
    }

    #[test]
    fn test_classify_between_sentences() {
        assert_eq!(
            classify("Insert this sentence between the second and third sentence in Section 11."),
            InsertionMode::WithinSection {
                section: "11".to_string(),
                sentence_after: Some(2),
            }
        );
    }

    #[test]
    fn test_classify_between_with_numeric_ordinals() {
        assert_eq!(
            classify("Add it between the 1st and 2nd sentence in section 3B"),
            InsertionMode::WithinSection {
                section: "3B".to_string(),
                sentence_after: None,
            }
        );
    }

    #[test]
    fn test_classify_between_unknown_ordinal() {
        assert_eq!(
            classify("between the umpteenth and next sentence in Section 2"),
            InsertionMode::WithinSection {
                section: "2".to_string(),
                sentence_after: None,
            }
        );
    }

    #[test]
    fn test_classify_first_matcher_wins() {
        // Contrived sentence using both phrasings
        assert_eq!(
            classify("Insert as section 5 between the first and second sentence in Section 6"),
            InsertionMode::AsNewSection {
                section: "5".to_string()
            }
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(
            classify("Replace the governing law clause"),
            InsertionMode::Unrecognized
        );
        // "as section" needs a word boundary before "as"
        assert_eq!(
            classify("Insert this alias section 2"),
            InsertionMode::Unrecognized
        );
    }

    #[test]
    fn test_ordinal_value_words() {
        assert_eq!(ordinal_value("first"), Some(1));
        assert_eq!(ordinal_value("Tenth"), Some(10));
        assert_eq!(ordinal_value("FIFTH"), Some(5));
    }

    #[test]
    fn test_ordinal_value_numerals_are_not_words() {
        assert_eq!(ordinal_value("2nd"), None);
        assert_eq!(ordinal_value("11th"), None);
        assert_eq!(ordinal_value("4"), None);
    }

    #[test]
    fn test_ordinal_value_unknown() {
        assert_eq!(ordinal_value("twentieth"), None);
        assert_eq!(ordinal_value("th"), None);
        assert_eq!(ordinal_value(""), None);
    }
}
