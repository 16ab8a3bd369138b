//! Per-document outline counter tracking.
//!
//! Word does not store the number a list paragraph displays; it is derived
//! from the paragraphs that precede it. [`NumberingTracker`] replays that
//! derivation over a document's paragraphs in order.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use super::label::format_label;

/// Identifier of one numbering scheme (`w:numId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(String);

impl ListId {
    /// Create a list identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Zero-based depth within a list (`w:ilvl`).
pub type LevelIndex = usize;

/// Counters for the levels of a single list.
///
/// Counters at or above the active level only grow; counters below it are
/// reset whenever a shallower-or-equal level increments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    counts: BTreeMap<LevelIndex, u32>,
}

impl CounterState {
    /// Create an empty counter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more paragraph at `level` and return counters `0..=level`.
    pub fn advance(&mut self, level: LevelIndex) -> Vec<u32> {
        for parent in 0..=level {
            self.counts.entry(parent).or_insert(0);
        }

        if let Some(count) = self.counts.get_mut(&level) {
            *count += 1;
        }

        // Drop state left by an abandoned deeper branch
        for (_, count) in self.counts.range_mut((Bound::Excluded(level), Bound::Unbounded)) {
            *count = 0;
        }

        self.counts
            .range(..=level)
            .map(|(_, &count)| count)
            .collect()
    }
}

/// Replays outline numbering over one document pass.
///
/// A tracker must be created per document and dropped afterwards; it is not
/// meant to be shared between documents or between passes.
#[derive(Debug, Default)]
pub struct NumberingTracker {
    lists: HashMap<ListId, CounterState>,
}

impl NumberingTracker {
    /// Create a tracker with no list state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counters of `list` at `level` and return the label the
    /// paragraph displays.
    ///
    /// # Examples
    /// ```
    /// use clause_inserter::numbering::{ListId, NumberingTracker};
    ///
    /// let list = ListId::new("1");
    /// let mut tracker = NumberingTracker::new();
    /// assert_eq!(tracker.advance(&list, 0), "1");
    /// assert_eq!(tracker.advance(&list, 1), "1A");
    /// assert_eq!(tracker.advance(&list, 1), "1B");
    /// assert_eq!(tracker.advance(&list, 0), "2");
    /// ```
    pub fn advance(&mut self, list: &ListId, level: LevelIndex) -> String {
        format_label(&self.advance_counters(list, level))
    }

    /// Advance and return the raw counters instead of the label.
    pub fn advance_counters(&mut self, list: &ListId, level: LevelIndex) -> Vec<u32> {
        self.lists.entry(list.clone()).or_default().advance(level)
    }
}

/// Compute the label of every paragraph in document order.
///
/// `None` entries are unnumbered paragraphs and receive the empty label.
/// A fresh tracker is used, so the result depends only on the input.
pub fn label_sequence<'a, I>(numbering: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<(&'a ListId, LevelIndex)>>,
{
    let mut tracker = NumberingTracker::new();
    numbering
        .into_iter()
        .map(|entry| match entry {
            Some((list, level)) => tracker.advance(list, level),
            None => String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_advance_fresh_list() {
        let list = ListId::new("1");
        let mut tracker = NumberingTracker::new();
        assert_eq!(tracker.advance(&list, 0), "1");
        assert_eq!(tracker.advance(&list, 0), "2");
    }

    #[test]
    fn test_advance_resets_deeper_levels() {
        let list = ListId::new("7");
        let mut tracker = NumberingTracker::new();
        assert_eq!(tracker.advance(&list, 0), "1");
        assert_eq!(tracker.advance(&list, 1), "1A");
        assert_eq!(tracker.advance(&list, 2), "1A(a)");
        assert_eq!(tracker.advance(&list, 0), "2");
        assert_eq!(tracker.advance(&list, 1), "2A");
        assert_eq!(tracker.advance(&list, 2), "2A(a)");
    }

    #[test]
    fn test_advance_middle_level_resets_only_deeper() {
        let list = ListId::new("1");
        let mut tracker = NumberingTracker::new();
        tracker.advance(&list, 0);
        tracker.advance(&list, 1);
        tracker.advance(&list, 2);
        tracker.advance(&list, 2);
        assert_eq!(tracker.advance(&list, 1), "1B");
        assert_eq!(tracker.advance(&list, 2), "1B(a)");
        assert_eq!(tracker.advance(&list, 3), "1B(a)(i)");
    }

    #[test]
    fn test_lists_are_independent() {
        let main = ListId::new("1");
        let schedule = ListId::new("2");
        let mut tracker = NumberingTracker::new();
        assert_eq!(tracker.advance(&main, 0), "1");
        assert_eq!(tracker.advance(&schedule, 0), "1");
        assert_eq!(tracker.advance(&main, 0), "2");
        assert_eq!(tracker.advance(&schedule, 1), "1A");
    }

    #[test]
    fn test_fresh_list_starting_deep_has_zero_parents() {
        let list = ListId::new("3");
        let mut tracker = NumberingTracker::new();
        assert_eq!(tracker.advance_counters(&list, 2), vec![0, 0, 1]);
    }

    #[test]
    fn test_counter_state_clears_abandoned_branch() {
        let mut state = CounterState::new();
        assert_eq!(state.advance(1), vec![0, 1]);
        assert_eq!(state.advance(2), vec![0, 1, 1]);
        assert_eq!(state.advance(0), vec![1]);
        assert_eq!(state.advance(2), vec![1, 0, 1]);
    }

    #[test]
    fn test_label_sequence_unnumbered_paragraphs() {
        let list = ListId::new("1");
        let labels = label_sequence([
            None,
            Some((&list, 0)),
            Some((&list, 1)),
            None,
            Some((&list, 2)),
            Some((&list, 0)),
        ]);
        assert_eq!(labels, vec!["", "1", "1A", "", "1A(a)", "2"]);
    }

    #[test]
    fn test_label_sequence_is_deterministic() {
        let list = ListId::new("1");
        let input = vec![Some((&list, 0)), Some((&list, 1)), Some((&list, 1))];
        assert_eq!(label_sequence(input.clone()), label_sequence(input));
    }
}
