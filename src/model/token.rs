//! Tagged token, the content of every leaf.

use std::fmt;

/// A word together with the tag assigned to it upstream.
///
/// The surface is the literal word or punctuation as produced by the
/// tokenizer; the tag comes from an open vocabulary (part-of-speech tag,
/// chunk tag or `PUNC`). Both are stored decoded, i.e. may contain literal
/// parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    surface: String,
    tag: String,
}

impl Token {
    /// Creates a new token.
    ///
    /// # Arguments
    /// * `surface` - The word as it appears in the sentence
    /// * `tag` - Its tag
    pub fn new(surface: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { surface: surface.into(), tag: tag.into() }
    }

    /// Returns the word.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Returns the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replaces the tag, keeping the surface.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }
}

impl fmt::Display for Token {
    /// Formats as `surface_TAG`, the format taggers emit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.surface, self.tag)
    }
}
