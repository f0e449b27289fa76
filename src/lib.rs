//! Chunktree reconstructs constituency trees from the flat output of a
//! chunker and merges named-entity spans into them.
//!
//! A chunker emits one line like
//! `[NP John_NNP Smith_NNP ] [VP works_VBZ ] [PP in_IN ] [NP Boston_NNP ] ._.`,
//! entity detectors emit lines like
//! `<START:person> John Smith <END> works in <START:location> Boston <END> .`.
//! This crate turns both into a single tree:
//! ```text
//! (S (PERSON (NNP John) (NNP Smith)) (VP (VBZ works)) (PP (IN in)) (LOCATION (NNP Boston)) (. .))
//! ```
//!
//! Core functionality provided:
//! - Flat output parsing: diagnostics stripping, delimiter escaping,
//!   bracket and `word_TAG` rewriting, see [crate::bracket].
//! - Normalization ("move up"): leaves are re-attached to their meaningful
//!   ancestor, redundant wrappers are collapsed, see [crate::normalize].
//! - Entity merging: spans of one or more detectors are wrapped into
//!   entity-labeled nodes, which replace redundant `NP` wrappers, see
//!   [crate::entity].
//! - Punctuation tags: optional rewrite of punctuation leaves to `PUNC`,
//!   see [crate::punctuation].
//! - Tree model: arena-based [ParseTree], see [crate::model].
//!
//! Calling the external engines is not part of this crate; output is
//! handed over as strings, or engines are plugged in through
//! [TextEngine](engine::TextEngine) and driven by [EnginePipeline].
//!
//! Limitations:
//! - Overlapping or crossing entity spans are not supported; a span that
//!   does not form a run of siblings is skipped.
//! - Entity words are aligned to tokens by exact match only.
//!
//! # Usage patterns
//! 1. The quick API [parse_chunked] uses the default configuration.
//! 2. A [ChunkTreeParser] with a [ChunkTreeConfig] gives full control and
//!    exposes the individual stages.
//!
//! ## Example Default Configuration
//! ```
//! use chunktree::{Token, parse_chunked};
//!
//! let tokens = vec![Token::new("Boston", "NNP"), Token::new("grows", "VBZ")];
//! let tree = parse_chunked(
//!     &tokens,
//!     "[NP Boston_NNP ] [VP grows_VBZ ]",
//!     &["<START:location> Boston <END> grows"],
//! )?;
//! assert_eq!(tree.to_string(), "(S (LOCATION (NNP Boston)) (VP (VBZ grows)))");
//! # Ok::<(), chunktree::ChunkTreeError>(())
//! ```
//!
//! ## Example Parser Configuration
//! ```
//! use chunktree::{ChunkTreeConfig, ChunkTreeParser, Token};
//!
//! let config = ChunkTreeConfig::new()
//!     .with_root_label("ROOT")          // Root label of rebuilt trees
//!     .with_punctuation_tags(true);     // Retag punctuation as PUNC
//! let parser = ChunkTreeParser::new(config);
//!
//! let tokens = vec![Token::new("Hi", "UH"), Token::new("!", ".")];
//! let tree = parser.build_tree(&tokens, "[INTJ Hi_UH ] !_.")?;
//! let tree = parser.finish(tree);
//! assert_eq!(tree.to_string(), "(ROOT (INTJ (UH Hi)) (PUNC !))");
//! # Ok::<(), chunktree::ChunkTreeError>(())
//! ```

pub mod bracket;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod punctuation;

pub use config::ChunkTreeConfig;
pub use error::{ChunkTreeError, ErrorKind};
pub use model::{ParseTree, Token};
pub use pipeline::{ChunkTreeParser, EnginePipeline};

// ============================================================================
// Quick API
// ============================================================================
/// Builds the tree of one sentence from chunker output and merges the
/// output of any number of entity detectors, using default settings.
///
/// See [ChunkTreeParser::parse] for full documentation.
pub fn parse_chunked<D: AsRef<str>>(
    tokens: &[Token],
    chunk_output: &str,
    detector_outputs: &[D],
) -> Result<ParseTree, ChunkTreeError> {
    ChunkTreeParser::default().parse(tokens, chunk_output, detector_outputs)
}
