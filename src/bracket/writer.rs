//! Serialization of trees to bracket notation and to a readable drawing.
//!
//! The one-line form is canonical: single spaces between children, no
//! trailing whitespace, literal parentheses encoded. Reading it back with
//! [BracketParser](crate::bracket::BracketParser) yields a structurally equal
//! tree.

use crate::bracket::defs::BUFFER_CHARS;
use crate::model::{NodeIndex, ParseTree};
use crate::parser::codec::encode;
use std::fmt;
use std::io::{self, Write};

/// Returns the bracket notation of the given tree.
///
/// Anonymous branches (label `None`, only present mid-normalization) are
/// transparent: their children are written in their place.
///
/// # Example
/// ```
/// use chunktree::bracket::{parse_str, to_bracketed};
///
/// let tree = parse_str("(S (NP (NNP John)   (NNP Smith) ) (. .))")?;
/// assert_eq!(to_bracketed(&tree), "(S (NP (NNP John) (NNP Smith)) (. .))");
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
pub fn to_bracketed(tree: &ParseTree) -> String {
    // Recursive helper appending one node
    fn build(tree: &ParseTree, out: &mut String, index: NodeIndex) {
        let node = &tree[index];

        if let Some(token) = node.token() {
            out.push('(');
            out.push_str(&encode(token.tag()));
            out.push(' ');
            out.push_str(&encode(token.surface()));
            out.push(')');
            return;
        }

        let label = node.label();
        if let Some(label) = label {
            out.push('(');
            out.push_str(&encode(label));
        }
        for (i, &child) in node.children().iter().enumerate() {
            if label.is_some() || i > 0 {
                out.push(' ');
            }
            build(tree, out, child);
        }
        if label.is_some() {
            out.push(')');
        }
    }

    if !tree.is_root_set() {
        return String::new();
    }

    let mut out = String::with_capacity(estimate_bracketed_len(tree));
    build(tree, &mut out, tree.root_index());
    out
}

/// Estimates the length of the bracket notation of a tree.
///
/// Each leaf needs its tag and surface plus `"( ) "`; each branch its label plus `"( ) "`.
pub(crate) fn estimate_bracketed_len(tree: &ParseTree) -> usize {
    const NODE_CHARS: usize = 4;

    tree.pre_order_iter()
        .map(|node| match node.token() {
            Some(token) => token.tag().len() + token.surface().len() + NODE_CHARS,
            None => node.label().map_or(0, str::len) + NODE_CHARS,
        })
        .sum::<usize>()
        + BUFFER_CHARS
}

/// Writes the given trees in bracket notation, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_bracketed<W: Write>(writer: &mut W, trees: &[ParseTree]) -> io::Result<()> {
    for tree in trees {
        writer.write_all(to_bracketed(tree).as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Returns a multi-line drawing of the tree, one node per line.
///
/// # Example Output
/// ```text
/// S
/// ├─ PERSON
/// │  ├─ NNP John
/// │  └─ NNP Smith
/// └─ . .
/// ```
pub fn to_pretty_string(tree: &ParseTree) -> String {
    fn build(tree: &ParseTree, out: &mut String, index: NodeIndex, prefix: &str, is_last: bool, is_root: bool) {
        let node = &tree[index];

        let connector = if is_root {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };
        out.push_str(prefix);
        out.push_str(connector);

        match node.token() {
            Some(token) => out.push_str(&format!("{} {}", token.tag(), token.surface())),
            None => out.push_str(node.label().unwrap_or("(anonymous)")),
        }
        out.push('\n');

        let child_prefix = if is_root {
            String::new()
        } else {
            format!("{}{}", prefix, if is_last { "   " } else { "│  " })
        };

        let children = node.children();
        for (i, &child) in children.iter().enumerate() {
            build(tree, out, child, &child_prefix, i + 1 == children.len(), false);
        }
    }

    let mut out = String::new();
    if tree.is_root_set() {
        build(tree, &mut out, tree.root_index(), "", true, true);
    }

    out
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_bracketed(self))
    }
}
