//! Boundary to the external tagging, chunking and entity engines.
//!
//! Engines are black boxes taking one line of input and returning a block of
//! text, or failing. [TextEngine] is that seam; anything from a spawned
//! process to a canned string in a test can implement it, closures included.
//! This module also formats engine input and reads tagger output.

use crate::bracket::PAIR_SEPARATOR;
use crate::bracket::flat::strip_diagnostics;
use crate::error::ChunkTreeError;
use crate::model::Token;

// =#========================================================================#=
// ENGINE TRAIT
// =#========================================================================#=
/// An external engine invoked with one line of text.
///
/// Calls are blocking round trips; timeouts and cancellation are up to the
/// implementation.
pub trait TextEngine {
    /// Runs the engine on `input` and returns its raw output.
    ///
    /// # Errors
    /// Returns [EngineInvocationFailed](crate::error::ErrorKind::EngineInvocationFailed)
    /// if the engine is unavailable or reports failure.
    fn invoke(&self, input: &str) -> Result<String, ChunkTreeError>;
}

impl<F> TextEngine for F
where
    F: Fn(&str) -> Result<String, ChunkTreeError>,
{
    fn invoke(&self, input: &str) -> Result<String, ChunkTreeError> {
        self(input)
    }
}

// ============================================================================
// Input formatting (pub)
// ============================================================================
/// Formats tagged tokens as chunker input: `word_TAG` pairs joined by spaces.
///
/// # Example
/// ```
/// use chunktree::engine::tagged_input;
/// use chunktree::model::Token;
///
/// let tokens = [Token::new("John", "NNP"), Token::new("works", "VBZ")];
/// assert_eq!(tagged_input(&tokens), "John_NNP works_VBZ");
/// ```
pub fn tagged_input(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect::<Vec<_>>().join(" ")
}

/// Formats tokens as detector input: words joined by spaces.
pub fn plain_input(tokens: &[Token]) -> String {
    tokens.iter().map(Token::surface).collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tagger output (pub)
// ============================================================================
/// Reads tagger output (`word_TAG word_TAG ...`) into tokens.
///
/// Diagnostic lines are stripped first. Each pair is split at its *last*
/// separator, so words containing the separator survive.
///
/// # Errors
/// Returns [MalformedEngineOutput](crate::error::ErrorKind::MalformedEngineOutput)
/// for a pair without separator or with an empty word or tag.
///
/// # Example
/// ```
/// use chunktree::engine::parse_tagged_output;
///
/// let tokens = parse_tagged_output("New_NNP York_NNP is_VBZ big_JJ ._.\nExecution time: 0.1 seconds")?;
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[4].surface(), ".");
/// assert_eq!(tokens[4].tag(), ".");
/// # Ok::<(), chunktree::ChunkTreeError>(())
/// ```
pub fn parse_tagged_output(raw: &str) -> Result<Vec<Token>, ChunkTreeError> {
    strip_diagnostics(raw)
        .split_whitespace()
        .map(|pair| match pair.rsplit_once(PAIR_SEPARATOR) {
            Some((surface, tag)) if !surface.is_empty() && !tag.is_empty() => Ok(Token::new(surface, tag)),
            _ => Err(ChunkTreeError::malformed(format!("not a word_TAG pair: {pair:?}"))),
        })
        .collect()
}
