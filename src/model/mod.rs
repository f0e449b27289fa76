//! Data model for constituency trees.
//!
//! # Tree representation
//! Trees are represented by [ParseTree], which uses the arena pattern to
//! store [Node]s referenced by [NodeIndex]. Each node is either a `Branch`
//! (labeled group with ordered children) or a `Leaf` carrying one [Token].
//! Parent links are plain indices used for upward navigation only.
//!
//! | Type | Role |
//! |------|------|
//! | [Token] | Word and tag of a leaf |
//! | [Node] | Arena entry, branch or leaf |
//! | [ParseTree] | Arena plus root, structural edits, traversal |
//!
//! # Building trees
//! Trees are typically produced by [BracketParser](crate::bracket::BracketParser)
//! and [normalize](crate::normalize::normalize), but can also be assembled
//! by hand (see [ParseTree]).

pub mod node;
pub mod token;
pub mod tree;

pub use node::Node;
pub use token::Token;
pub use tree::{NodeIndex, ParseTree};
