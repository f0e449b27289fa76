//! Error types for tree reconstruction and entity merging.
//!
//! This module provides [ChunkTreeError] and [ErrorKind] for representing
//! and reporting errors that occur while turning engine output into trees.
//! Every error is terminal for the sentence being processed; nothing here is
//! retried or repaired.

use crate::parser::byte_parser::ByteParser;
use std::error::Error;
use std::fmt;
use thiserror::Error as ThisError;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 40;

// =#========================================================================#=
// ERROR KIND
// =#========================================================================#=
/// Kinds of failures that can occur while building or merging a tree.
#[derive(ThisError, PartialEq, Eq, Debug, Clone)]
pub enum ErrorKind {
    /// Flat or bracketed engine output could not be parsed into a tree
    /// (unbalanced brackets, missing group label, stray text, lost tokens).
    #[error("Malformed engine output - {0}")]
    MalformedEngineOutput(String),

    /// Normalization exceeded its step budget, carried as payload.
    #[error("Normalization did not terminate within {0} steps")]
    NormalizationDivergence(usize),

    /// An external engine (chunker or entity detector) reported failure.
    #[error("Engine invocation failed - {0}")]
    EngineInvocationFailed(String),

    /// Raw output already contained one of the codec's escape markers.
    #[error("Encoding collision - {0}")]
    EncodingCollision(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Invalid configuration - {0}")]
    InvalidConfig(String),
}

// =#========================================================================#=
// CHUNK TREE ERROR
// =#========================================================================#=
/// Error with optional positional information (byte offset and upcoming bytes).
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkTreeError {
    kind: ErrorKind,
    position: Option<usize>,
    context: String,
}

impl ChunkTreeError {
    /// Create an error from a kind and the current state of a [ByteParser].
    pub fn from_parser(kind: ErrorKind, parser: &ByteParser) -> Self {
        Self {
            kind,
            position: Some(parser.position()),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Create an error without positional context
    pub fn without_context(kind: ErrorKind) -> Self {
        Self { kind, position: None, context: String::new() }
    }

    /// Convenience constructor for MalformedEngineOutput at the parser position
    pub fn malformed_at(parser: &ByteParser, msg: impl Into<String>) -> Self {
        Self::from_parser(ErrorKind::MalformedEngineOutput(msg.into()), parser)
    }

    /// Convenience constructor for MalformedEngineOutput
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::without_context(ErrorKind::MalformedEngineOutput(msg.into()))
    }

    /// Convenience constructor for NormalizationDivergence
    pub fn divergence(budget: usize) -> Self {
        Self::without_context(ErrorKind::NormalizationDivergence(budget))
    }

    /// Convenience constructor for EngineInvocationFailed
    pub fn engine_failed(msg: impl Into<String>) -> Self {
        Self::without_context(ErrorKind::EngineInvocationFailed(msg.into()))
    }

    /// Convenience constructor for EncodingCollision, pointing at the marker
    pub fn encoding_collision(marker: &str, position: usize) -> Self {
        Self {
            kind: ErrorKind::EncodingCollision(format!("raw output contains marker {marker}")),
            position: Some(position),
            context: String::new(),
        }
    }

    /// Convenience constructor for InvalidConfig
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::without_context(ErrorKind::InvalidConfig(msg.into()))
    }

    /// Get the error kind
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Get the byte position where the error occurred, if known
    pub fn position(&self) -> Option<usize> {
        self.position
    }
}

impl fmt::Display for ChunkTreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(position) = self.position {
            write!(f, " at position {position}")?;
        }

        if !self.context.is_empty() {
            write!(f, "\n  Context (next {} bytes): {}", self.context.len(), self.context)?;
        }

        Ok(())
    }
}

impl Error for ChunkTreeError {}

impl From<ErrorKind> for ChunkTreeError {
    fn from(kind: ErrorKind) -> Self {
        Self::without_context(kind)
    }
}
