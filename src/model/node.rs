//! Node module for the parse tree arena.

use crate::model::token::Token;
use crate::model::tree::NodeIndex;

/// Marks a node that is the root or not attached (yet).
pub(crate) const NO_PARENT_SET: NodeIndex = usize::MAX;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// Represents a node in a [ParseTree](crate::model::ParseTree).
///
/// A node can be either:
/// - **Branch**: A labeled (or, transiently, anonymous) group with an ordered
///   list of children
/// - **Leaf**: Carries exactly one [Token], has no children
///
/// # Invariants
/// - `index` is the position of the node in the arena
/// - `parent` is the arena index of the parent; `NO_PARENT_SET` for the root
///   and for nodes not (or no longer) attached to the tree
/// - Order of `children` is left-to-right surface order
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Node {
    /// Group node (phrase, entity, or sentence root)
    Branch {
        /// Index of this node in the tree arena
        index: NodeIndex,
        /// Index of the parent node
        parent: NodeIndex,
        /// Label of the group; `None` only for anonymous wrappers during normalization
        label: Option<String>,
        /// Indices of the child nodes, in surface order
        children: Vec<NodeIndex>,
    },
    /// Leaf node holding one token
    Leaf {
        /// Index of this node in the tree arena
        index: NodeIndex,
        /// Index of the parent node
        parent: NodeIndex,
        /// The word and its tag
        token: Token,
    },
}

impl Node {
    /// Creates a new branch node without parent.
    pub fn new_branch(index: NodeIndex, label: Option<String>, children: Vec<NodeIndex>) -> Self {
        Node::Branch { index, parent: NO_PARENT_SET, label, children }
    }

    /// Creates a new leaf node without parent.
    pub fn new_leaf(index: NodeIndex, token: Token) -> Self {
        Node::Leaf { index, parent: NO_PARENT_SET, token }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        match self {
            Node::Branch { index, .. } | Node::Leaf { index, .. } => *index,
        }
    }

    pub(crate) fn set_index(&mut self, new_index: NodeIndex) {
        match self {
            Node::Branch { index, .. } | Node::Leaf { index, .. } => *index = new_index,
        }
    }

    /// Returns the parent index, or `None` for the root and detached nodes.
    pub fn parent(&self) -> Option<NodeIndex> {
        let parent = match self {
            Node::Branch { parent, .. } | Node::Leaf { parent, .. } => *parent,
        };
        (parent != NO_PARENT_SET).then_some(parent)
    }

    /// Returns whether a parent is set.
    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    pub(crate) fn set_parent(&mut self, new_parent: NodeIndex) {
        match self {
            Node::Branch { parent, .. } | Node::Leaf { parent, .. } => *parent = new_parent,
        }
    }

    pub(crate) fn clear_parent(&mut self) {
        self.set_parent(NO_PARENT_SET);
    }

    /// Returns whether this is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Returns whether this is a branch.
    pub fn is_branch(&self) -> bool {
        matches!(self, Node::Branch { .. })
    }

    /// Returns the label of a branch; `None` for leaves and anonymous branches.
    pub fn label(&self) -> Option<&str> {
        match self {
            Node::Branch { label, .. } => label.as_deref(),
            Node::Leaf { .. } => None,
        }
    }

    /// Returns the children of a branch; empty for leaves.
    pub fn children(&self) -> &[NodeIndex] {
        match self {
            Node::Branch { children, .. } => children,
            Node::Leaf { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeIndex>> {
        match self {
            Node::Branch { children, .. } => Some(children),
            Node::Leaf { .. } => None,
        }
    }

    /// Returns the token of a leaf.
    pub fn token(&self) -> Option<&Token> {
        match self {
            Node::Leaf { token, .. } => Some(token),
            Node::Branch { .. } => None,
        }
    }

    /// Returns the token of a leaf, mutably.
    pub fn token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Node::Leaf { token, .. } => Some(token),
            Node::Branch { .. } => None,
        }
    }
}
