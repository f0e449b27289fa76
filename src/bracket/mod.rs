//! Bracket notation: flat engine output conversion, reading and writing.
//!
//! This module turns the one-line output of a chunker into a preliminary
//! [ParseTree](crate::model::ParseTree) and writes trees back out.
//!
//! # Quick API
//! * [`parse_str`] - parse bracket notation
//! * [`parse_flat`] - convert and parse flat chunker output
//! * [`to_bracketed`] - serialize a tree to one line
//!
//! # Full API
//! * [flat] - the individual rewrite steps of flat output
//! * [BracketParser] - configurable reader over a
//!   [ByteParser](crate::parser::byte_parser::ByteParser)

mod defs;
pub mod flat;
pub mod parser;
pub mod writer;

pub use defs::{MAX_DEPTH, PAIR_PASSES, PAIR_SEPARATOR};
pub use parser::BracketParser;
pub use writer::{to_bracketed, to_pretty_string, write_bracketed};

use crate::error::ChunkTreeError;
use crate::model::ParseTree;
use crate::parser::byte_parser::ByteParser;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single tree in bracket notation.
///
/// # Example
/// ```
/// use chunktree::bracket::parse_str;
///
/// let tree = parse_str("(S (NP (NNP John)) (. .))")?;
/// assert_eq!(tree.num_leaves(), 2);
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
pub fn parse_str<S: AsRef<str>>(text: S) -> Result<ParseTree, ChunkTreeError> {
    let mut byte_parser = ByteParser::for_str(text.as_ref());
    BracketParser::new().parse(&mut byte_parser)
}

/// Converts flat chunker output (see [flat]) and parses the result into a
/// preliminary, not yet normalized tree.
///
/// # Example
/// ```
/// use chunktree::bracket::parse_flat;
///
/// let tree = parse_flat("[NP John_NNP ] [VP works_VBZ ] ._.", "S")?;
/// assert_eq!(tree.to_string(), "(S (NP (NNP John)) (VP (VBZ works)) (. .))");
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
pub fn parse_flat(raw: &str, root_label: &str) -> Result<ParseTree, ChunkTreeError> {
    let text = flat::to_bracketed_text(raw, root_label, false)?;
    parse_str(text)
}
