//! Conversion of flat chunker output into bracket notation.
//!
//! A chunker emits one line such as
//! `[NP John_NNP Smith_NNP ] [VP works_VBZ ] ._.`, possibly followed by a
//! diagnostic timing line. [to_bracketed_text] turns it into
//! `(S (NP (NNP John) (NNP Smith)) (VP (VBZ works)) (. .))`:
//! 1. strip the trailing diagnostic line,
//! 2. [encode](crate::parser::codec::encode) literal parentheses,
//! 3. rewrite chunk openers `[LABEL` and closers `]` to parentheses,
//! 4. rewrite every whitespace-bounded `surface_TAG` pair to `(TAG surface)`,
//!    in exactly [PAIR_PASSES] passes,
//! 5. wrap everything in one root group.

use crate::bracket::defs::{NATIVE_CLOSE, NATIVE_OPEN, PAIR_PASSES, PAIR_SEPARATOR};
use crate::error::ChunkTreeError;
use crate::parser::codec::{encode, find_marker_collision};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Trailing line reporting engine timing, e.g. `\nExecution time: 0.123 seconds`.
static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[ \t]*Execution time:[^\n]*\s*\z").expect("Valid diagnostic line regex")
});

/// A `surface_TAG` pair bounded by whitespace; the tag holds no separator,
/// so the split happens at the last one.
static TAGGED_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+([^\s()]+)_([^\s_()]+)\s+").expect("Valid tagged pair regex")
});

/// Removes the engine's trailing diagnostic line from raw output.
///
/// Only a last line following the output is removed; output that merely
/// starts with the diagnostic text is kept.
///
/// # Examples
/// ```
/// # use chunktree::bracket::flat::strip_diagnostics;
/// let raw = "[NP it_PRP ] ._.\nExecution time: 0,042 seconds\n";
/// assert_eq!(strip_diagnostics(raw).trim(), "[NP it_PRP ] ._.");
/// ```
pub fn strip_diagnostics(raw: &str) -> Cow<'_, str> {
    DIAGNOSTIC_LINE.replace_all(raw, "")
}

/// Rewrites chunk openers and closers to parentheses, piece by piece.
///
/// A piece `[LABEL` (label without `[`, `]` or the pair separator) opens a
/// group, a lone `[` opens a group without label, a lone `]` closes one.
/// Pieces like `[_-LRB-` are tokens and stay untouched. Pieces are re-joined
/// with single spaces.
pub fn rewrite_chunk_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);

    for piece in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }

        match piece.strip_prefix(NATIVE_OPEN) {
            Some(label) if !label.contains(['[', ']', PAIR_SEPARATOR]) => {
                out.push('(');
                out.push_str(label);
            }
            _ if piece == NATIVE_CLOSE => out.push(')'),
            _ => out.push_str(piece),
        }
    }

    out
}

/// Rewrites `surface_TAG` pairs to `(TAG surface)`, applying the pattern
/// exactly [PAIR_PASSES] times.
///
/// # Examples
/// ```
/// # use chunktree::bracket::flat::rewrite_pairs;
/// assert_eq!(rewrite_pairs("(NP a_DT b_NN c_NN )").split_whitespace().collect::<Vec<_>>(),
///            ["(NP", "(DT", "a)", "(NN", "b)", "(NN", "c)", ")"]);
/// ```
pub fn rewrite_pairs(text: &str) -> String {
    let mut current = format!(" {text} ");
    for _ in 0..PAIR_PASSES {
        current = TAGGED_PAIR.replace_all(&current, " (${2} ${1}) ").into_owned();
    }

    current
}

/// Converts raw flat chunker output into bracket notation rooted at `root_label`.
///
/// # Arguments
/// * `raw` - Chunker output, diagnostics included
/// * `root_label` - Label of the synthetic root group
/// * `reject_collisions` - Whether to fail if `raw` contains a codec marker
///
/// # Errors
/// Returns [EncodingCollision](crate::error::ErrorKind::EncodingCollision) if
/// `reject_collisions` is set and the output contains a marker verbatim.
/// Everything else is left to the bracket reader.
pub fn to_bracketed_text(raw: &str, root_label: &str, reject_collisions: bool) -> Result<String, ChunkTreeError> {
    let stripped = strip_diagnostics(raw);

    if reject_collisions {
        if let Some((marker, position)) = find_marker_collision(&stripped) {
            return Err(ChunkTreeError::encoding_collision(marker, position));
        }
    }

    let encoded = encode(&stripped);
    let bracketed = rewrite_chunk_brackets(&encoded);
    let paired = rewrite_pairs(&bracketed);

    Ok(format!("({} {})", root_label, paired.trim()))
}
