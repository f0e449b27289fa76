//! Provides the arena-based parse tree.
//!
//! * [ParseTree] - constituency tree with index-based parent/child links
//! * [NodeIndex] - type used to index nodes in the arena
//!
//! All structural edits used by normalization and entity merging
//! ([splice_child](ParseTree::splice_child),
//! [wrap_children](ParseTree::wrap_children),
//! [replace_with_only_child](ParseTree::replace_with_only_child),
//! [prune_empty_branches](ParseTree::prune_empty_branches)) rewrite indices
//! only. Nodes that get detached stay in the arena until
//! [compact](ParseTree::compact) is called.

use crate::bracket::writer;
use crate::model::node::Node;
use crate::model::token::Token;
use std::ops::Range;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: NodeIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A constituency tree represented using the arena pattern on [Node].
///
/// # Structure
/// - All nodes (root, branches, leaves) are stored in the arena.
/// - Index of root is maintained.
/// - No assumption on order of indices is maintained, unless the tree was
///   just [compacted](ParseTree::compact) (then pre-order).
/// - Reading the leaves left-to-right yields the sentence.
///
/// # Construction
/// Add leaves first, then branches over already added nodes, finally set
/// the root. Test validity with [`ParseTree::is_valid()`].
///
/// # Example
/// ```
/// use chunktree::model::{ParseTree, Token};
///
/// let mut tree = ParseTree::new();
/// let john = tree.add_leaf(Token::new("John", "NNP"));
/// let works = tree.add_leaf(Token::new("works", "VBZ"));
/// let np = tree.add_branch(Some("NP".to_string()), vec![john]);
/// let vp = tree.add_branch(Some("VP".to_string()), vec![works]);
/// let root = tree.add_branch(Some("S".to_string()), vec![np, vp]);
/// tree.set_root(root);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.surfaces(), vec!["John", "works"]);
/// assert_eq!(tree.to_string(), "(S (NP (NNP John)) (VP (VBZ works)))");
/// ```
#[derive(Debug, Clone)]
pub struct ParseTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Index of the root of this tree
    root_index: NodeIndex,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl ParseTree {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        ParseTree { nodes: Vec::with_capacity(capacity), root_index: NO_ROOT_SET_INDEX }
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    pub fn add_leaf(&mut self, token: Token) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new_leaf(index, token));
        index
    }

    /// Adds a branch over already added nodes, assigning a unique index,
    /// which gets returned. The parent of each child is set to the new branch.
    ///
    /// # Arguments
    /// * `label` - Label of the group, `None` for an anonymous wrapper
    /// * `children` - Child indices in surface order
    ///
    /// # Panics
    /// Panics if a child index is out of bounds.
    pub fn add_branch(&mut self, label: Option<String>, children: Vec<NodeIndex>) -> NodeIndex {
        let index = self.nodes.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.nodes.push(Node::new_branch(index, label, children));
        index
    }

    /// Declares the given node as root; its parent link is cleared.
    pub fn set_root(&mut self, index: NodeIndex) {
        self[index].clear_parent();
        self.root_index = index;
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns a reference to the root node.
    ///
    /// # Panics
    /// Panics if the root hasn't been set.
    pub fn root(&self) -> &Node {
        &self[self.root_index]
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self[index]
    }

    /// Returns a mutable reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self[index]
    }

    /// Returns the label of a branch (see [Node::label]).
    pub fn label(&self, index: NodeIndex) -> Option<&str> {
        self[index].label()
    }

    /// Returns the children of a node (see [Node::children]).
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self[index].children()
    }

    /// Returns the parent of a node (see [Node::parent]).
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self[index].parent()
    }

    /// Returns the position of `child` in the child list of `parent`.
    pub fn child_position(&self, parent: NodeIndex, child: NodeIndex) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Returns the number of nodes in the arena, including detached ones.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves reachable from the root.
    pub fn num_leaves(&self) -> usize {
        self.pre_order_iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of branches reachable from the root.
    pub fn num_branches(&self) -> usize {
        self.pre_order_iter().filter(|n| n.is_branch()).count()
    }

    /// Returns whether the given node is a branch without branch children.
    pub fn is_flat(&self, index: NodeIndex) -> bool {
        self[index].is_branch() && self.children(index).iter().all(|&c| self[c].is_leaf())
    }

    /// Returns the indices of all leaves in surface (left-to-right) order.
    pub fn leaf_indices(&self) -> Vec<NodeIndex> {
        self.pre_order_iter().filter(|n| n.is_leaf()).map(|n| n.index()).collect()
    }

    /// Returns the tokens of all leaves in surface order.
    pub fn leaves(&self) -> impl Iterator<Item = &Token> + '_ {
        self.pre_order_iter().filter_map(|n| n.token())
    }

    /// Returns the words of the sentence, i.e. leaf surfaces in order.
    pub fn surfaces(&self) -> Vec<&str> {
        self.leaves().map(|t| t.surface()).collect()
    }

    /// Returns the tokens of all leaves below (or at) the given node, in order.
    pub fn leaves_under(&self, index: NodeIndex) -> Vec<&Token> {
        PreOrderIter::from_node(self, index).filter_map(|n| n.token()).collect()
    }

    /// Returns the indices of all reachable branches with the given label, in pre-order.
    pub fn branches_labeled(&self, label: &str) -> Vec<NodeIndex> {
        self.pre_order_iter()
            .filter(|n| n.label() == Some(label))
            .map(|n| n.index())
            .collect()
    }

    /// Returns a multi-line drawing of this tree (see [writer::to_pretty_string]).
    pub fn to_pretty_string(&self) -> String {
        writer::to_pretty_string(self)
    }
}

impl Default for ParseTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<NodeIndex> for ParseTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

impl std::ops::IndexMut<NodeIndex> for ParseTree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

// =$========================================================================$=
// STRUCTURAL EDITS
// =$========================================================================$=
impl ParseTree {
    /// Replaces the branch at `position` in the child list of `parent` by
    /// that branch's own children, keeping their order. The removed branch
    /// is detached.
    ///
    /// # Returns
    /// * `Some(k)` - Number of children moved up into `parent`
    /// * `None` - If the child at `position` is a leaf (nothing changed)
    ///
    /// # Panics
    /// Panics if `position` is out of bounds.
    pub fn splice_child(&mut self, parent: NodeIndex, position: usize) -> Option<usize> {
        let child = self.children(parent)[position];
        let grandchildren = std::mem::take(self[child].children_mut()?);

        for &grandchild in &grandchildren {
            self[grandchild].set_parent(parent);
        }
        self[child].clear_parent();

        let moved = grandchildren.len();
        if let Some(children) = self[parent].children_mut() {
            children.splice(position..position + 1, grandchildren);
        }

        Some(moved)
    }

    /// Wraps the children of `parent` at the given positions into a new
    /// branch labeled `label`, which takes their place.
    ///
    /// # Returns
    /// The index of the new branch.
    ///
    /// # Panics
    /// Panics if `range` is empty or out of bounds.
    pub fn wrap_children(&mut self, parent: NodeIndex, range: Range<usize>, label: String) -> NodeIndex {
        assert!(!range.is_empty(), "cannot wrap an empty range");
        let moved = self.children(parent)[range.clone()].to_vec();
        let wrapper = self.add_branch(Some(label), moved);
        self[wrapper].set_parent(parent);

        if let Some(children) = self[parent].children_mut() {
            children.splice(range, [wrapper]);
        }

        wrapper
    }

    /// Replaces a branch having exactly one child by that child, which takes
    /// its position. The replaced branch is detached.
    ///
    /// # Returns
    /// `true` if replaced; `false` if `index` is the root, detached, or does
    /// not have exactly one child.
    pub fn replace_with_only_child(&mut self, index: NodeIndex) -> bool {
        let &[child] = self.children(index) else {
            return false;
        };
        let Some(parent) = self.parent(index) else {
            return false;
        };
        let Some(position) = self.child_position(parent, index) else {
            return false;
        };

        if let Some(children) = self[parent].children_mut() {
            children[position] = child;
        }
        self[child].set_parent(parent);
        if let Some(children) = self[index].children_mut() {
            children.clear();
        }
        self[index].clear_parent();

        true
    }

    /// Detaches every non-root branch without children, including branches
    /// that only become empty through this removal.
    ///
    /// # Returns
    /// Number of branches removed.
    pub fn prune_empty_branches(&mut self) -> usize {
        let order: Vec<NodeIndex> = self.post_order_iter().map(|n| n.index()).collect();
        let mut removed = 0;

        for index in order {
            if index == self.root_index || !self[index].is_branch() || !self.children(index).is_empty() {
                continue;
            }
            if let Some(parent) = self.parent(index) {
                if let Some(children) = self[parent].children_mut() {
                    children.retain(|&c| c != index);
                }
                self[index].clear_parent();
                removed += 1;
            }
        }

        removed
    }

    /// Returns a copy of this tree containing only nodes reachable from the
    /// root, re-indexed in pre-order.
    pub fn compact(&self) -> ParseTree {
        if !self.is_root_set() {
            return ParseTree::new();
        }

        let order: Vec<NodeIndex> = self.pre_order_iter().map(|n| n.index()).collect();
        let mut new_index = vec![NO_ROOT_SET_INDEX; self.nodes.len()];
        for (new, &old) in order.iter().enumerate() {
            new_index[old] = new;
        }

        let mut nodes = Vec::with_capacity(order.len());
        for (new, &old) in order.iter().enumerate() {
            let mut node = self[old].clone();
            node.set_index(new);
            match node.parent() {
                Some(parent) => node.set_parent(new_index[parent]),
                None => node.clear_parent(),
            }
            if let Some(children) = node.children_mut() {
                for child in children.iter_mut() {
                    *child = new_index[*child];
                }
            }
            nodes.push(node);
        }

        ParseTree { nodes, root_index: 0 }
    }
}

// =$========================================================================$=
// VALIDATION AND COMPARISON
// =$========================================================================$=
impl ParseTree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, in bounds, points to a branch without parent
    /// - All node indices match their position in the arena
    /// - Every reachable node is reached exactly once (no sharing, no cycles)
    /// - All children of a reachable branch point back to it as parent
    /// - Every reachable leaf has a non-empty surface
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.root_index >= self.nodes.len() {
            return false;
        }
        if !self.root().is_branch() || self.root().has_parent() {
            return false;
        }
        if self.nodes.iter().enumerate().any(|(i, n)| n.index() != i) {
            return false;
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            if seen[index] {
                return false;
            }
            seen[index] = true;

            let node = &self[index];
            if let Some(token) = node.token() {
                if token.surface().is_empty() {
                    return false;
                }
            }

            for &child in node.children() {
                if child >= self.nodes.len() || self[child].parent() != Some(index) {
                    return false;
                }
                stack.push(child);
            }
        }

        true
    }

    /// Compares two trees by shape, labels and tokens, ignoring arena
    /// layout and detached nodes.
    pub fn structurally_eq(&self, other: &ParseTree) -> bool {
        match (self.is_root_set(), other.is_root_set()) {
            (false, false) => return true,
            (true, true) => {}
            _ => return false,
        }

        let mut stack = vec![(self.root_index, other.root_index)];
        while let Some((a, b)) = stack.pop() {
            let (a, b) = (&self[a], &other[b]);
            if a.label() != b.label()
                || a.token() != b.token()
                || a.is_leaf() != b.is_leaf()
                || a.children().len() != b.children().len()
            {
                return false;
            }
            stack.extend(a.children().iter().copied().zip(b.children().iter().copied()));
        }

        true
    }
}

impl PartialEq for ParseTree {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_eq(other)
    }
}

impl Eq for ParseTree {}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl ParseTree {
    /// Returns an iterator over the reachable tree in post-order
    /// (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the reachable tree in pre-order
    /// (parents before children, children left to right).
    ///
    /// Leaves are thus visited in surface order.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        if self.is_root_set() {
            PreOrderIter::from_node(self, self.root_index)
        } else {
            PreOrderIter { tree: self, stack: Vec::new() }
        }
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PostOrderIter<'a> {
    tree: &'a ParseTree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a ParseTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.children().is_empty() {
                return Some(node);
            }

            self.stack.push((index, true));
            // Push children in reverse, so leftmost is processed first
            for &child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a ParseTree,
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn from_node(tree: &'a ParseTree, start: NodeIndex) -> Self {
        PreOrderIter { tree, stack: vec![start] }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
