//! Merging entity spans into a normalized tree.
//!
//! For each span, in detector order, the run of leaves spelling the span's
//! words is located and wrapped in a new node labeled with the upper-cased
//! entity type. Tags are ignored for matching, so leaves keep their own tags
//! below the entity node.
//!
//! A run can only be wrapped if it is a contiguous sequence of siblings: the
//! leaves themselves, or, when an earlier entity or phrase sits inside the
//! run, the children of the lowest common ancestor that together cover
//! exactly the span's leaves. The occurrence at the aligned token position is
//! tried first, then every other occurrence left to right. A run that already
//! is the full content of a node with the same label is left untouched.
//!
//! After wrapping, a [promotable](crate::config::ChunkTreeConfig::promotable_labels)
//! wrapper (e.g. `NP`) whose only child is the new entity node is replaced by it.

use crate::config::ChunkTreeConfig;
use crate::entity::span::{EntitySpan, find_run};
use crate::model::{NodeIndex, ParseTree};
use std::ops::Range;
use tracing::{debug, warn};

/// Result of merging a single span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new entity node was inserted (and possibly promoted).
    Wrapped(NodeIndex),
    /// The aligned run already is an entity node with this label.
    AlreadyPresent,
    /// No occurrence of the span forms a sibling run; the tree is unchanged.
    NotFound,
}

/// Merges spans into `tree`, in order.
///
/// Spans must refer to positions in the tree's leaf sequence.
///
/// # Returns
/// One [MergeOutcome] per span.
pub fn merge_spans(tree: &mut ParseTree, spans: &[EntitySpan], config: &ChunkTreeConfig) -> Vec<MergeOutcome> {
    let leaf_ids = tree.leaf_indices();
    let surfaces: Vec<String> = tree.surfaces().into_iter().map(str::to_string).collect();
    let mut ranges = leaf_ranges(tree);

    spans
        .iter()
        .map(|span| {
            let outcome = merge_span(tree, &leaf_ids, &surfaces, &mut ranges, span, config);
            match outcome {
                MergeOutcome::Wrapped(node) => {
                    debug!(label = %span.label(), tokens = ?span.tokens, node, "wrapped entity span");
                }
                MergeOutcome::AlreadyPresent => {
                    debug!(label = %span.label(), tokens = ?span.tokens, "entity already present");
                }
                MergeOutcome::NotFound => warn!(
                    label = %span.label(),
                    words = ?surfaces.get(span.tokens.clone()),
                    "entity span does not form a sibling run, skipping"
                ),
            }
            outcome
        })
        .collect()
}

fn merge_span(
    tree: &mut ParseTree,
    leaf_ids: &[NodeIndex],
    surfaces: &[String],
    ranges: &mut Vec<(usize, usize)>,
    span: &EntitySpan,
    config: &ChunkTreeConfig,
) -> MergeOutcome {
    let Some(words) = surfaces.get(span.tokens.clone()) else {
        return MergeOutcome::NotFound;
    };
    if words.is_empty() {
        return MergeOutcome::NotFound;
    }
    let label = span.label();

    for start in candidate_starts(surfaces, words, span.tokens.start) {
        let Some((parent, run)) = locate_run(tree, leaf_ids, ranges, start, words.len()) else {
            continue;
        };

        let already_present =
            tree.label(parent) == Some(label.as_str()) && run.start == 0 && run.end == tree.children(parent).len();
        if already_present {
            if start == span.tokens.start {
                return MergeOutcome::AlreadyPresent;
            }
            continue;
        }

        let entity = tree.wrap_children(parent, run, label);
        debug_assert_eq!(entity, ranges.len());
        ranges.push((start, start + words.len()));

        if promote(tree, parent, entity, config) {
            debug!(wrapper = parent, entity, "entity replaced redundant wrapper");
        }

        return MergeOutcome::Wrapped(entity);
    }

    MergeOutcome::NotFound
}

/// Aligned start first, then every other occurrence of `words` left to right.
fn candidate_starts(surfaces: &[String], words: &[String], aligned: usize) -> Vec<usize> {
    let mut starts = vec![aligned];
    let mut from = 0;
    while let Some(start) = find_run(surfaces, words, from) {
        if start != aligned {
            starts.push(start);
        }
        from = start + 1;
    }

    starts
}

/// Finds the parent and child positions of the sibling run covering exactly
/// the leaves `start..start + len`.
fn locate_run(
    tree: &ParseTree,
    leaf_ids: &[NodeIndex],
    ranges: &[(usize, usize)],
    start: usize,
    len: usize,
) -> Option<(NodeIndex, Range<usize>)> {
    let end = start + len;
    let first = leaf_ids[start];
    let last = leaf_ids[end - 1];

    let (parent, left, right) = if first == last {
        (tree.parent(first)?, first, first)
    } else {
        lowest_common_ancestor(tree, first, last)?
    };

    if ranges[left].0 != start || ranges[right].1 != end {
        return None;
    }

    let left_pos = tree.child_position(parent, left)?;
    let right_pos = tree.child_position(parent, right)?;
    Some((parent, left_pos..right_pos + 1))
}

/// Returns the lowest common ancestor of two distinct nodes, together with its
/// children on the paths to `a` and to `b`.
fn lowest_common_ancestor(tree: &ParseTree, a: NodeIndex, b: NodeIndex) -> Option<(NodeIndex, NodeIndex, NodeIndex)> {
    let mut path_a = vec![a];
    let mut on_path = vec![false; tree.num_nodes()];
    on_path[a] = true;
    while let Some(parent) = tree.parent(*path_a.last()?) {
        if on_path[parent] {
            return None;
        }
        on_path[parent] = true;
        path_a.push(parent);
    }

    let mut below_b = b;
    loop {
        let parent = tree.parent(below_b)?;
        if on_path[parent] {
            let below_a = path_a.iter().copied().find(|&n| tree.parent(n) == Some(parent))?;
            return Some((parent, below_a, below_b));
        }
        below_b = parent;
    }
}

/// Replaces `wrapper` by `entity` if the wrapper is promotable and has no other child.
fn promote(tree: &mut ParseTree, wrapper: NodeIndex, entity: NodeIndex, config: &ChunkTreeConfig) -> bool {
    if wrapper == tree.root_index() || tree.children(wrapper) != [entity].as_slice() {
        return false;
    }

    match tree.label(wrapper) {
        Some(label) if config.is_promotable(label) => tree.replace_with_only_child(wrapper),
        _ => false,
    }
}

/// Leaf positions `(first, end)` covered by each node; `(usize::MAX, 0)` for
/// nodes without leaves or not reachable.
fn leaf_ranges(tree: &ParseTree) -> Vec<(usize, usize)> {
    let mut ranges = vec![(usize::MAX, 0); tree.num_nodes()];
    let mut next_leaf = 0;

    for node in tree.post_order_iter() {
        let index = node.index();
        if node.is_leaf() {
            ranges[index] = (next_leaf, next_leaf + 1);
            next_leaf += 1;
        } else {
            for &child in node.children() {
                ranges[index].0 = ranges[index].0.min(ranges[child].0);
                ranges[index].1 = ranges[index].1.max(ranges[child].1);
            }
        }
    }

    ranges
}
