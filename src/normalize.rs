//! Tree normalization ("move up").
//!
//! The bracketing of a chunker reflects its surface grouping, not the
//! constituent boundaries wanted downstream. [normalize] re-derives them in
//! two passes over a preliminary tree:
//!
//! 1. **Relabel and rebuild.** The tree is copied bottom-up into a fresh
//!    arena. The root gets the configured root label. A flat branch (only
//!    leaf children) is labeled with its nearest meaningful label, looking at
//!    itself first and then upward, where root-like labels do not count; with
//!    none found it becomes anonymous. A branch with nested branches keeps its
//!    own label, unless that label is root-like, in which case it becomes
//!    anonymous.
//! 2. **Move up.** Walking down from the root, every branch child that is
//!    anonymous or repeats its parent's label is replaced in place by its own
//!    children, order preserved, and the same position is examined again.
//!
//! Finally branches left without children are pruned and the arena is
//! compacted. The result does not change when normalized again.

use crate::config::ChunkTreeConfig;
use crate::error::ChunkTreeError;
use crate::model::{NodeIndex, ParseTree};
use tracing::trace;

/// Steps allowed per arena node before normalization is declared divergent.
const STEPS_PER_NODE: usize = 4;

/// Normalizes a preliminary tree, returning a new, compacted tree.
///
/// # Errors
/// Returns [NormalizationDivergence](crate::error::ErrorKind::NormalizationDivergence)
/// if the input is not a tree (shared or cyclic child links) or restructuring
/// exceeds its step budget.
///
/// # Example
/// ```
/// use chunktree::bracket::parse_str;
/// use chunktree::config::ChunkTreeConfig;
/// use chunktree::normalize::normalize;
///
/// let tree = parse_str("(S (S (NP (NNP John))) (NP (NP (NNP Smith))))")?;
/// let normalized = normalize(&tree, &ChunkTreeConfig::default())?;
/// assert_eq!(normalized.to_string(), "(S (NP (NNP John)) (NP (NNP Smith)))");
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
pub fn normalize(tree: &ParseTree, config: &ChunkTreeConfig) -> Result<ParseTree, ChunkTreeError> {
    if !tree.is_root_set() {
        return Ok(ParseTree::new());
    }

    let budget = STEPS_PER_NODE * tree.num_nodes() + STEPS_PER_NODE;
    let mut rebuilt = relabel(tree, config, budget)?;
    move_up(&mut rebuilt, budget)?;
    rebuilt.prune_empty_branches();

    Ok(rebuilt.compact())
}

// ============================================================================
// Pass 1: relabel and rebuild
// ============================================================================
/// Copies `tree` into a fresh arena, assigning labels as described in the
/// module documentation.
fn relabel(tree: &ParseTree, config: &ChunkTreeConfig, budget: usize) -> Result<ParseTree, ChunkTreeError> {
    // Recursive helper returning the index of the copy of `index`
    fn rebuild(
        source: &ParseTree,
        target: &mut ParseTree,
        index: NodeIndex,
        inherited: Option<&str>,
        config: &ChunkTreeConfig,
        visited: &mut [bool],
    ) -> Result<NodeIndex, ChunkTreeError> {
        if visited[index] {
            return Err(ChunkTreeError::divergence(visited.len()));
        }
        visited[index] = true;

        let node = &source[index];
        if let Some(token) = node.token() {
            return Ok(target.add_leaf(token.clone()));
        }

        let own = node.label().filter(|label| !config.is_root_label(label));
        let meaningful = own.or(inherited);

        let is_root = index == source.root_index();
        let label = if is_root {
            Some(config.root_label.clone())
        } else if source.is_flat(index) {
            meaningful.map(str::to_string)
        } else {
            own.map(str::to_string)
        };

        let mut children = Vec::with_capacity(node.children().len());
        for &child in node.children() {
            children.push(rebuild(source, target, child, meaningful, config, visited)?);
        }

        Ok(target.add_branch(label, children))
    }

    let mut visited = vec![false; tree.num_nodes()];
    let mut target = ParseTree::with_capacity(tree.num_nodes());
    let root = rebuild(tree, &mut target, tree.root_index(), None, config, &mut visited)
        .map_err(|_| ChunkTreeError::divergence(budget))?;
    target.set_root(root);

    Ok(target)
}

// ============================================================================
// Pass 2: move up
// ============================================================================
/// Splices anonymous and label-repeating branch children into their parents.
fn move_up(tree: &mut ParseTree, budget: usize) -> Result<(), ChunkTreeError> {
    let mut steps = 0;
    let mut visited = vec![false; tree.num_nodes()];
    let mut pending = vec![tree.root_index()];

    while let Some(index) = pending.pop() {
        if visited[index] {
            return Err(ChunkTreeError::divergence(budget));
        }
        visited[index] = true;

        let mut position = 0;
        let mut next_branches = Vec::new();
        while position < tree.children(index).len() {
            steps += 1;
            if steps > budget {
                return Err(ChunkTreeError::divergence(budget));
            }

            let child = tree.children(index)[position];
            if tree[child].is_leaf() {
                position += 1;
                continue;
            }

            let child_label = tree.label(child);
            if child_label.is_none() || child_label == tree.label(index) {
                trace!(parent = index, child, ?child_label, "moving up children");
                tree.splice_child(index, position);
            } else {
                next_branches.push(child);
                position += 1;
            }
        }

        // Leftmost branch on top, so the walk goes left to right
        pending.extend(next_branches.into_iter().rev());
    }

    Ok(())
}
