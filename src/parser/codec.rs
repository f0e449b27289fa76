//! Reversible escaping of the tree's structural delimiters.
//!
//! Literal `(` and `)` inside words would break bracket matching, so raw
//! engine output is [encoded](encode) before any scanning and every leaf is
//! [decoded](decode) exactly once when the bracket reader creates it. The
//! [writer](crate::bracket::writer) encodes again on output.
//!
//! Text that already contains one of the markers cannot be told apart from
//! encoded text. By default this is accepted as a limitation;
//! [find_marker_collision] allows callers to reject such input up front.

use std::borrow::Cow;

/// Marker replacing a literal opening parenthesis.
pub const OPEN_MARKER: &str = "%LRB%";

/// Marker replacing a literal closing parenthesis.
pub const CLOSE_MARKER: &str = "%RRB%";

/// Returns whether `c` is a structural delimiter of the bracket notation.
#[inline]
pub fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')'
}

/// Replaces every literal delimiter in `text` with its marker.
///
/// Borrows the input if there is nothing to replace.
///
/// # Examples
/// ```
/// # use chunktree::parser::codec::encode;
/// assert_eq!(encode("Boston"), "Boston");
/// assert_eq!(encode(":-)"), ":-%RRB%");
/// assert_eq!(encode("(see)"), "%LRB%see%RRB%");
/// ```
pub fn encode(text: &str) -> Cow<'_, str> {
    if !text.contains(is_delimiter) {
        return Cow::Borrowed(text);
    }

    let mut encoded = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '(' => encoded.push_str(OPEN_MARKER),
            ')' => encoded.push_str(CLOSE_MARKER),
            _ => encoded.push(c),
        }
    }

    Cow::Owned(encoded)
}

/// Replaces every marker in `text` with the delimiter it stands for;
/// left inverse of [encode].
///
/// # Examples
/// ```
/// # use chunktree::parser::codec::{decode, encode};
/// assert_eq!(decode("%LRB%see%RRB%"), "(see)");
/// assert_eq!(decode(&encode("f(x)")), "f(x)");
/// ```
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.replace(OPEN_MARKER, "(").replace(CLOSE_MARKER, ")"))
}

/// Finds the first verbatim occurrence of a marker in raw text.
///
/// # Returns
/// * `Some((marker, byte_offset))` - The earliest marker found
/// * `None` - If the text is safe to encode
pub fn find_marker_collision(text: &str) -> Option<(&'static str, usize)> {
    [OPEN_MARKER, CLOSE_MARKER]
        .into_iter()
        .filter_map(|marker| text.find(marker).map(|pos| (marker, pos)))
        .min_by_key(|&(_, pos)| pos)
}
