//! Finding sentence boundaries in a paragraph split into runs.

/// Character that ends a sentence.
pub const SENTENCE_TERMINATOR: char = '.';

/// Coordinate space used to place the terminator of the target sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetPolicy {
    /// Count terminators over the concatenated paragraph text and map the
    /// result back to a run. The splice lands right after the terminator.
    #[default]
    Paragraph,

    /// Historical behaviour: find the run holding the target sentence, but
    /// take the terminator offset from the *payload* text and splice before
    /// that offset in the run (clamped to the run length). Kept for
    /// reproducing documents produced by earlier versions of the tool.
    Payload,
}

/// A terminator located in a paragraph.
///
/// With [`OffsetPolicy::Paragraph`] `char_offset` is relative to the run
/// `fragment_index`; with [`OffsetPolicy::Payload`] it is relative to the
/// payload text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentencePosition {
    pub fragment_index: usize,
    pub char_offset: usize,
}

/// Where to insert text: a run and a char offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplicePoint {
    pub fragment_index: usize,
    pub char_offset: usize,
}

/// Locates the end of the n-th sentence of a paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceLocator {
    policy: OffsetPolicy,
}

impl SentenceLocator {
    /// Create a locator using `policy`.
    #[must_use]
    pub fn new(policy: OffsetPolicy) -> Self {
        Self { policy }
    }

    /// The offset policy in use.
    #[must_use]
    pub fn policy(&self) -> OffsetPolicy {
        self.policy
    }

    /// Locate the terminator of sentence `ordinal` (1-based).
    ///
    /// Returns `None` when the paragraph has fewer sentences, when
    /// `ordinal` is 0, or (payload policy) when the payload has too few
    /// terminators.
    pub fn locate<S: AsRef<str>>(
        &self,
        fragments: &[S],
        ordinal: u32,
        payload: &str,
    ) -> Option<SentencePosition> {
        match self.policy {
            OffsetPolicy::Paragraph => locate_in_paragraph(fragments, ordinal),
            OffsetPolicy::Payload => locate_in_payload(fragments, ordinal, payload),
        }
    }

    /// Resolve the point at which the payload is spliced in.
    pub fn splice_point<S: AsRef<str>>(
        &self,
        fragments: &[S],
        ordinal: u32,
        payload: &str,
    ) -> Option<SplicePoint> {
        let position = self.locate(fragments, ordinal, payload)?;
        let char_offset = match self.policy {
            OffsetPolicy::Paragraph => position.char_offset + 1,
            OffsetPolicy::Payload => {
                let run_len = fragments
                    .get(position.fragment_index)?
                    .as_ref()
                    .chars()
                    .count();
                position.char_offset.min(run_len)
            }
        };

        Some(SplicePoint {
            fragment_index: position.fragment_index,
            char_offset,
        })
    }
}

/// Char index of the `n`-th (1-based) occurrence of `needle`.
fn nth_char_index(text: &str, needle: char, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    text.chars()
        .enumerate()
        .filter(|(_, c)| *c == needle)
        .nth(n - 1)
        .map(|(i, _)| i)
}

fn terminator_count(text: &str) -> usize {
    text.chars().filter(|c| *c == SENTENCE_TERMINATOR).count()
}

/// Find the run holding the end of sentence `ordinal` and the number of
/// terminators that precede that run.
fn find_run<S: AsRef<str>>(fragments: &[S], ordinal: u32) -> Option<(usize, usize)> {
    let ordinal = usize::try_from(ordinal).ok().filter(|&n| n > 0)?;
    let mut seen_before = 0;

    for (index, fragment) in fragments.iter().enumerate() {
        let count = terminator_count(fragment.as_ref());
        if count == 0 {
            continue;
        }
        if seen_before + count >= ordinal {
            return Some((index, seen_before));
        }
        seen_before += count;
    }

    None
}

/// Locate the terminator over the concatenated paragraph text, then map the
/// global offset back to a run.
fn locate_in_paragraph<S: AsRef<str>>(fragments: &[S], ordinal: u32) -> Option<SentencePosition> {
    let ordinal = usize::try_from(ordinal).ok()?;
    let paragraph: String = fragments.iter().map(AsRef::as_ref).collect();
    let global = nth_char_index(&paragraph, SENTENCE_TERMINATOR, ordinal)?;

    let mut start = 0;
    for (fragment_index, fragment) in fragments.iter().enumerate() {
        let len = fragment.as_ref().chars().count();
        if global < start + len {
            return Some(SentencePosition {
                fragment_index,
                char_offset: global - start,
            });
        }
        start += len;
    }

    None
}

fn locate_in_payload<S: AsRef<str>>(
    fragments: &[S],
    ordinal: u32,
    payload: &str,
) -> Option<SentencePosition> {
    let (fragment_index, seen_before) = find_run(fragments, ordinal)?;
    let wanted = usize::try_from(ordinal).ok()? - seen_before;
    let char_offset = nth_char_index(payload, SENTENCE_TERMINATOR, wanted)?;

    Some(SentencePosition {
        fragment_index,
        char_offset,
    })
}

/// Insert `" " + payload` into `fragment` at char offset `at`.
///
/// Offsets past the end append.
///
/// # Examples
/// ```
/// use clause_inserter::sentence::splice_text;
///
/// assert_eq!(
///     splice_text("One. Two.", 4, "Inserted."),
///     "One. Inserted. Two."
/// );
/// ```
#[must_use]
pub fn splice_text(fragment: &str, at: usize, payload: &str) -> String {
    let byte_at = fragment
        .char_indices()
        .nth(at)
        .map_or(fragment.len(), |(i, _)| i);

    let mut out = String::with_capacity(fragment.len() + payload.len() + 1);
    out.push_str(&fragment[..byte_at]);
    out.push(' ');
    out.push_str(payload);
    out.push_str(&fragment[byte_at..]);
    out
}
