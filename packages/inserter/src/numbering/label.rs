//! Outline label formatting.
//!
//! Turns the counters of one numbered paragraph into the label Word would
//! display for the contract outline style used by the firm's templates:
//! `1`, `1A`, `1A(a)`, `1A(a)(i)`.

/// Lowercase roman numerals for list values 1 through 20.
const ROMAN_NUMERALS: [&str; 20] = [
    "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "xi", "xii", "xiii", "xiv",
    "xv", "xvi", "xvii", "xviii", "xix", "xx",
];

/// Map 1..=26 to a letter starting at `base`.
///
/// Values outside the alphabet degrade to their decimal numeral.
fn letter(n: u32, base: u8) -> String {
    match n {
        1..=26 => char::from(base + (n - 1) as u8).to_string(),
        _ => n.to_string(),
    }
}

/// Uppercase letter for the second outline level (1 → A, 2 → B).
///
/// # Examples
/// ```
/// use clause_inserter::numbering::to_letter;
///
/// assert_eq!(to_letter(1), "A");
/// assert_eq!(to_letter(26), "Z");
/// assert_eq!(to_letter(27), "27");
/// ```
#[must_use]
pub fn to_letter(n: u32) -> String {
    letter(n, b'A')
}

/// Lowercase letter for the third outline level (1 → a, 2 → b).
#[must_use]
pub fn to_lower_letter(n: u32) -> String {
    letter(n, b'a')
}

/// Lowercase roman numeral for the fourth level and deeper.
///
/// Only 1..=20 have a numeral; anything else falls back to decimal.
///
/// # Examples
/// ```
/// use clause_inserter::numbering::to_roman;
///
/// assert_eq!(to_roman(4), "iv");
/// assert_eq!(to_roman(20), "xx");
/// assert_eq!(to_roman(21), "21");
/// ```
#[must_use]
pub fn to_roman(n: u32) -> String {
    usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| ROMAN_NUMERALS.get(i))
        .map_or_else(|| n.to_string(), |s| (*s).to_string())
}

/// Build the display label from per-level counters.
///
/// `levels[0]` is the top level counter, `levels[k]` the counter of the
/// active level. An empty slice yields the empty label, which callers treat
/// as "unnumbered".
///
/// # Examples
/// ```
/// use clause_inserter::numbering::format_label;
///
/// assert_eq!(format_label(&[]), "");
/// assert_eq!(format_label(&[1]), "1");
/// assert_eq!(format_label(&[1, 1]), "1A");
/// assert_eq!(format_label(&[1, 1, 1]), "1A(a)");
/// assert_eq!(format_label(&[1, 1, 1, 1]), "1A(a)(i)");
/// ```
#[must_use]
pub fn format_label(levels: &[u32]) -> String {
    let mut label = String::new();

    for (depth, &value) in levels.iter().enumerate() {
        match depth {
            0 => label.push_str(&value.to_string()),
            1 => label.push_str(&to_letter(value)),
            2 => {
                label.push('(');
                label.push_str(&to_lower_letter(value));
                label.push(')');
            }
            _ => {
                label.push('(');
                label.push_str(&to_roman(value));
                label.push(')');
            }
        }
    }

    label
}
