//! Text shortening and wrapping for terminal output.

use textwrap::{fill, Options};

/// Shorten `text` to at most `max_chars` characters, marking the cut with
/// an ellipsis. Whitespace runs are collapsed first.
///
/// # Examples
/// ```
/// use clause_inserter::output::preview;
///
/// assert_eq!(preview("Short text", 20), "Short text");
/// assert_eq!(preview("The Supplier shall  maintain insurance", 16), "The Supplier sh…");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut shortened: String = collapsed
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect();
    shortened.push('…');
    shortened
}

/// Wrap `text` at `width`, indenting every line by `indent`.
pub fn wrap_preview(text: &str, width: usize, indent: &str) -> String {
    let options = Options::new(width)
        .initial_indent(indent)
        .subsequent_indent(indent);
    fill(text, options)
}
