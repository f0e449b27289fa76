//! Punctuation tag post-processing.
//!
//! Taggers give punctuation a zoo of tags (`,`, `.`, `:`, `$(`, ...).
//! With [punctuation_tag_enabled](crate::config::ChunkTreeConfig::punctuation_tag_enabled)
//! set, every leaf whose surface and tag both consist of punctuation only is
//! retagged [PUNCTUATION_TAG]. This runs after all structural merges.

use crate::model::ParseTree;

/// Tag given to punctuation leaves.
pub const PUNCTUATION_TAG: &str = "PUNC";

/// Non-ASCII characters counted as punctuation.
const EXTRA_PUNCTUATION: &[char] = &[
    '«', '»', '‹', '›', '“', '”', '„', '‘', '’', '‚', '…', '–', '—', '¡', '¿', '·', '§',
];

/// Returns whether `text` is non-empty and consists of punctuation characters only.
///
/// # Examples
/// ```
/// # use chunktree::punctuation::is_punctuation;
/// assert!(is_punctuation(","));
/// assert!(is_punctuation("$("));
/// assert!(!is_punctuation("-LRB-"));
/// assert!(is_punctuation("«"));
/// assert!(!is_punctuation("NN"));
/// assert!(!is_punctuation("U.S."));
/// assert!(!is_punctuation(""));
/// ```
pub fn is_punctuation(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| c.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&c))
}

/// Retags every punctuation leaf in place.
///
/// # Returns
/// Number of leaves retagged.
pub fn collapse_punctuation_tags(tree: &mut ParseTree) -> usize {
    let mut retagged = 0;

    for index in tree.leaf_indices() {
        if let Some(token) = tree.node_mut(index).token_mut() {
            if is_punctuation(token.surface()) && is_punctuation(token.tag()) && token.tag() != PUNCTUATION_TAG {
                token.set_tag(PUNCTUATION_TAG);
                retagged += 1;
            }
        }
    }

    retagged
}
