//! Entity span extraction, alignment and merging.
//!
//! # Quick API
//! * [`merge_detector_output`] - merge one detector's raw output into a tree
//!
//! # Full API
//! * [extract_spans] and [align_spans] - from raw output to [EntitySpan]s
//! * [merge_spans] - insert aligned spans into a tree

pub mod merge;
pub mod span;

pub use merge::{MergeOutcome, merge_spans};
pub use span::{DetectedSpan, EntitySpan, align_spans, extract_spans};

use crate::config::ChunkTreeConfig;
use crate::error::ChunkTreeError;
use crate::model::ParseTree;
use tracing::debug;

/// Merges all entities marked in one detector's raw output into `tree`.
///
/// The tree is edited in place and is not re-normalized here; see
/// [ChunkTreeParser::merge_entities](crate::ChunkTreeParser::merge_entities)
/// for the full multi-detector pass.
///
/// # Arguments
/// * `tree` - A normalized tree whose leaves spell `tokens`
/// * `tokens` - Original token surfaces the detector was run on
/// * `raw` - The detector's output
///
/// # Returns
/// Number of entity nodes inserted.
///
/// # Errors
/// Returns [MalformedEngineOutput](crate::error::ErrorKind::MalformedEngineOutput)
/// if the leaves of `tree` do not spell `tokens`.
pub fn merge_detector_output<S: AsRef<str>>(
    tree: &mut ParseTree,
    tokens: &[S],
    raw: &str,
    config: &ChunkTreeConfig,
) -> Result<usize, ChunkTreeError> {
    let surfaces = tree.surfaces();
    if surfaces.len() != tokens.len() || surfaces.iter().zip(tokens).any(|(s, t)| *s != t.as_ref()) {
        return Err(ChunkTreeError::malformed("tree leaves do not match the token sequence"));
    }

    let detected = extract_spans(raw);
    let spans = align_spans(&detected, tokens);
    debug!(detected = detected.len(), aligned = spans.len(), "merging detector output");

    let outcomes = merge_spans(tree, &spans, config);
    Ok(outcomes.iter().filter(|o| matches!(o, MergeOutcome::Wrapped(_))).count())
}
