//! Locating sections by their outline label.

use regex::Regex;
use std::sync::LazyLock;

use super::tracker::LevelIndex;

/// Top level section reference, e.g. "11".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TOP_LEVEL_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// Second level section reference, e.g. "1A".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SECOND_LEVEL_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[A-Za-z]$").expect("valid regex"));

/// Find the first paragraph whose label equals `target`.
///
/// Returns `None` when no paragraph carries the label. The empty label marks
/// unnumbered paragraphs and never matches.
///
/// # Examples
/// ```
/// use clause_inserter::numbering::locate_section;
///
/// let labels = ["1", "1A", "1A(a)", "2"];
/// assert_eq!(locate_section(&labels, "1A"), Some(1));
/// assert_eq!(locate_section(&labels, "9"), None);
/// ```
pub fn locate_section<S: AsRef<str>>(labels: &[S], target: &str) -> Option<usize> {
    if target.is_empty() {
        return None;
    }
    labels.iter().position(|label| label.as_ref() == target)
}

/// Outline level implied by the shape of a section reference.
///
/// `"12"` is a top level section (0), `"12B"` a second level one (1). Other
/// shapes are not section references this tool recognises.
#[must_use]
pub fn level_for_section_label(label: &str) -> Option<LevelIndex> {
    if TOP_LEVEL_LABEL.is_match(label) {
        Some(0)
    } else if SECOND_LEVEL_LABEL.is_match(label) {
        Some(1)
    } else {
        None
    }
}
